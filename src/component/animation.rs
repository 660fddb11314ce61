//! Animation 组件
//!
//! 记录当前播放的动画片段名和播放时钟。采样和把姿态写回节点由场景完成，
//! 组件本身只负责推进时间和过渡。

use super::{Component, ComponentType, ComponentUpdate};
use crate::editor::Inspector;

/// 从上一个片段过渡到当前片段的状态
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationBlend {
    /// 过渡前的片段
    pub from: String,
    /// 过渡前片段的播放时间
    pub from_time: f32,
    /// 过渡总时长（秒）
    pub duration: f32,
    pub elapsed: f32,
}

impl AnimationBlend {
    /// 当前片段的权重，0..1
    pub fn weight(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }
}

/// Animation 组件
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentAnimation {
    clip: Option<String>,
    time: f32,
    looping: bool,
    playing: bool,
    pub speed: f32,
    blend: Option<AnimationBlend>,
}

impl ComponentAnimation {
    pub fn new() -> Self {
        Self {
            clip: None,
            time: 0.0,
            looping: true,
            playing: false,
            speed: 1.0,
            blend: None,
        }
    }

    pub fn set_clip(&mut self, clip: impl Into<String>) {
        self.clip = Some(clip.into());
        self.time = 0.0;
        self.blend = None;
    }

    pub fn clip(&self) -> Option<&str> {
        self.clip.as_deref()
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn blend(&self) -> Option<&AnimationBlend> {
        self.blend.as_ref()
    }

    /// 从头播放当前片段
    pub fn play(&mut self, looping: bool) {
        self.looping = looping;
        self.playing = true;
        self.time = 0.0;
    }

    pub fn stop(&mut self) {
        self.playing = false;
        self.blend = None;
    }

    /// 在 `duration` 秒内从当前片段过渡到 `clip`
    ///
    /// 没有正在播放的片段时直接切换。
    pub fn blend_to(&mut self, clip: impl Into<String>, duration: f32) {
        let clip = clip.into();
        match self.clip.take() {
            Some(from) if self.playing && duration > 0.0 => {
                self.blend = Some(AnimationBlend {
                    from,
                    from_time: self.time,
                    duration,
                    elapsed: 0.0,
                });
            }
            _ => self.blend = None,
        }
        self.clip = Some(clip);
        self.time = 0.0;
        self.playing = true;
    }
}

impl Default for ComponentAnimation {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for ComponentAnimation {
    fn component_type(&self) -> ComponentType {
        ComponentType::Animation
    }

    fn on_update(&mut self, ctx: &ComponentUpdate<'_>) -> bool {
        if !self.playing {
            return true;
        }

        let step = ctx.delta_time * self.speed;
        if !step.is_finite() {
            crate::engine_warn!(
                delta_time = ctx.delta_time,
                speed = self.speed,
                "Skipping non-finite animation step"
            );
            return true;
        }
        self.time += step;

        if let Some(blend) = &mut self.blend {
            blend.from_time += step;
            blend.elapsed += ctx.delta_time;
            if blend.elapsed >= blend.duration {
                self.blend = None;
            }
        }

        true
    }

    fn on_editor(&mut self, inspector: &mut dyn Inspector) -> bool {
        inspector.text(self.clip.as_deref().unwrap_or("<none>"));
        let mut changed = inspector.checkbox("Loop", &mut self.looping);
        changed |= inspector.drag_float("Speed", &mut self.speed, 0.05, 0.0, 10.0);

        if self.playing {
            if inspector.button("Stop") {
                self.stop();
                changed = true;
            }
        } else if inspector.button("Play") {
            self.play(self.looping);
            changed = true;
        }

        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Matrix4;

    fn tick(anim: &mut ComponentAnimation, dt: f32) {
        anim.on_update(&ComponentUpdate::new(dt, Matrix4::identity()));
    }

    #[test]
    fn test_clock_advances_only_while_playing() {
        let mut anim = ComponentAnimation::new();
        anim.set_clip("Idle");
        tick(&mut anim, 0.5);
        assert_eq!(anim.time(), 0.0);

        anim.play(true);
        tick(&mut anim, 0.5);
        tick(&mut anim, 0.25);
        assert_eq!(anim.time(), 0.75);
    }

    #[test]
    fn test_non_finite_step_leaves_clock() {
        let mut anim = ComponentAnimation::new();
        anim.set_clip("Idle");
        anim.play(true);
        tick(&mut anim, 0.5);

        tick(&mut anim, f32::NAN);
        tick(&mut anim, f32::INFINITY);
        anim.speed = f32::NAN;
        tick(&mut anim, 0.5);
        assert_eq!(anim.time(), 0.5);
    }

    #[test]
    fn test_blend_to_finishes_after_duration() {
        let mut anim = ComponentAnimation::new();
        anim.set_clip("Idle");
        anim.play(true);
        tick(&mut anim, 1.0);

        anim.blend_to("Walk", 0.5);
        assert_eq!(anim.clip(), Some("Walk"));
        let blend = anim.blend().unwrap();
        assert_eq!(blend.from, "Idle");
        assert_eq!(blend.from_time, 1.0);
        assert_eq!(blend.weight(), 0.0);

        tick(&mut anim, 0.25);
        assert_eq!(anim.blend().unwrap().weight(), 0.5);

        tick(&mut anim, 0.25);
        assert!(anim.blend().is_none());
        assert_eq!(anim.time(), 0.5);
    }

    #[test]
    fn test_blend_without_current_clip_switches() {
        let mut anim = ComponentAnimation::new();
        anim.blend_to("Run", 1.0);
        assert_eq!(anim.clip(), Some("Run"));
        assert!(anim.blend().is_none());
        assert!(anim.is_playing());
    }
}
