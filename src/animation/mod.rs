//! 骨骼/节点动画模块
//!
//! 动画片段由若干节点通道组成，每个通道针对一个按名称匹配的节点，
//! 保存位置、旋转、缩放三组关键帧。[`AnimationLibrary`] 按名称保存已加载的片段，
//! 场景每帧根据 Animation 组件的时钟从这里采样姿态。

mod clip;

pub use clip::{AnimationClip, AnimationPose, Keyframe, NodeChannel, NodePose};

use std::collections::HashMap;

/// 已加载动画片段的集合
#[derive(Debug, Clone, Default)]
pub struct AnimationLibrary {
    clips: HashMap<String, AnimationClip>,
}

impl AnimationLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// 加入一个片段，返回被同名替换掉的旧片段
    pub fn insert(&mut self, clip: AnimationClip) -> Option<AnimationClip> {
        tracing::debug!(
            clip = %clip.name,
            duration = clip.duration,
            channels = clip.channels.len(),
            "Animation clip registered"
        );
        self.clips.insert(clip.name.clone(), clip)
    }

    pub fn get(&self, name: &str) -> Option<&AnimationClip> {
        self.clips.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.clips.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<AnimationClip> {
        self.clips.remove(name)
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.clips.keys().map(String::as_str)
    }

    /// 采样指定片段；片段不存在时返回 `None`
    pub fn sample(&self, name: &str, time: f32, looping: bool) -> Option<AnimationPose> {
        self.get(name).map(|clip| clip.sample(time, looping))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vector3;

    #[test]
    fn test_library_lookup_and_sample() {
        let mut channel = NodeChannel::new("Arm");
        channel.scales = vec![Keyframe::new(0.0, Vector3::repeat(2.0))];

        let mut library = AnimationLibrary::new();
        assert!(library.insert(AnimationClip::new("Wave", 1.0).with_channel(channel)).is_none());

        assert!(library.contains("Wave"));
        assert_eq!(library.len(), 1);
        assert!(library.sample("Missing", 0.0, true).is_none());

        let pose = library.sample("Wave", 0.3, true).unwrap();
        assert_eq!(pose.get("Arm").unwrap().scale, Some(Vector3::repeat(2.0)));
    }

    #[test]
    fn test_insert_replaces_same_name() {
        let mut library = AnimationLibrary::new();
        library.insert(AnimationClip::new("Idle", 1.0));
        let old = library.insert(AnimationClip::new("Idle", 2.0)).unwrap();

        assert_eq!(old.duration, 1.0);
        assert_eq!(library.get("Idle").unwrap().duration, 2.0);
    }
}
