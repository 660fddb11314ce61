//! 编辑器检视面板接口
//!
//! 每个组件通过 [`Inspector`] 在面板里读写自己的字段。具体控件由外部的即时模式 UI 提供。

/// 即时模式检视面板控件
///
/// 所有返回 `bool` 的控件在本帧被交互（值被修改或按钮被点击）时返回 `true`。
pub trait Inspector {
    /// 可折叠标题，展开时返回 `true`
    fn collapsing_header(&mut self, label: &str) -> bool;

    fn checkbox(&mut self, label: &str, value: &mut bool) -> bool;

    fn button(&mut self, label: &str) -> bool;

    /// 同一行继续放置下一个控件
    fn same_line(&mut self) {}

    fn drag_float(&mut self, label: &str, value: &mut f32, speed: f32, min: f32, max: f32) -> bool;

    fn drag_float3(&mut self, label: &str, value: &mut [f32; 3], speed: f32) -> bool;

    fn drag_float4(&mut self, label: &str, value: &mut [f32; 4], speed: f32, min: f32, max: f32) -> bool;

    fn text(&mut self, text: &str);

    /// 上一个控件是否被点击
    fn is_item_clicked(&self) -> bool;
}

/// 一个组件面板的交互结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EditorResponse {
    /// 面板内有控件被交互
    pub interacted: bool,
    /// 用户点击了删除按钮
    pub delete_requested: bool,
}

impl EditorResponse {
    pub fn merge(self, other: EditorResponse) -> EditorResponse {
        EditorResponse {
            interacted: self.interacted || other.interacted,
            delete_requested: self.delete_requested || other.delete_requested,
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! 脚本化的检视面板，测试用

    use super::Inspector;

    #[derive(Default)]
    pub struct ScriptedInspector {
        /// 被"点击"的按钮标签
        pub clicks: Vec<String>,
        /// 要写入的 drag_float 值
        pub floats: Vec<(String, f32)>,
        /// 要写入的 drag_float4 值
        pub colors: Vec<(String, [f32; 4])>,
        /// 要切换的复选框
        pub toggles: Vec<String>,
        /// 所有出现过的控件标签
        pub seen: Vec<String>,
    }

    impl Inspector for ScriptedInspector {
        fn collapsing_header(&mut self, label: &str) -> bool {
            self.seen.push(label.to_string());
            true
        }

        fn checkbox(&mut self, label: &str, value: &mut bool) -> bool {
            self.seen.push(label.to_string());
            if self.toggles.iter().any(|t| t == label) {
                *value = !*value;
                return true;
            }
            false
        }

        fn button(&mut self, label: &str) -> bool {
            self.seen.push(label.to_string());
            self.clicks.iter().any(|c| c == label)
        }

        fn drag_float(&mut self, label: &str, value: &mut f32, _speed: f32, min: f32, max: f32) -> bool {
            self.seen.push(label.to_string());
            match self.floats.iter().find(|(l, _)| l == label) {
                Some((_, v)) => {
                    *value = v.clamp(min, max);
                    true
                }
                None => false,
            }
        }

        fn drag_float3(&mut self, label: &str, _value: &mut [f32; 3], _speed: f32) -> bool {
            self.seen.push(label.to_string());
            false
        }

        fn drag_float4(&mut self, label: &str, value: &mut [f32; 4], _speed: f32, min: f32, max: f32) -> bool {
            self.seen.push(label.to_string());
            match self.colors.iter().find(|(l, _)| l == label) {
                Some((_, v)) => {
                    *value = v.map(|c| c.clamp(min, max));
                    true
                }
                None => false,
            }
        }

        fn text(&mut self, text: &str) {
            self.seen.push(text.to_string());
        }

        fn is_item_clicked(&self) -> bool {
            false
        }
    }
}
