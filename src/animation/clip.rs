//! 动画片段与关键帧采样

use std::collections::HashMap;

use crate::math::{utils, Quaternion, Vector3};

/// 关键帧
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe<T> {
    /// 时间（秒）
    pub time: f32,
    pub value: T,
}

impl<T> Keyframe<T> {
    pub fn new(time: f32, value: T) -> Self {
        Self { time, value }
    }
}

/// 一个节点在某一时刻的局部姿态，缺失的分量保持节点原值
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NodePose {
    pub position: Option<Vector3>,
    pub rotation: Option<Quaternion>,
    pub scale: Option<Vector3>,
}

impl NodePose {
    /// 按权重 `weight`（0 = self，1 = other）混合两个姿态
    pub fn blend(&self, other: &NodePose, weight: f32) -> NodePose {
        NodePose {
            position: blend_option(self.position, other.position, |a, b| {
                utils::lerp_vec3(&a, &b, weight)
            }),
            rotation: blend_option(self.rotation, other.rotation, |a, b| slerp(&a, &b, weight)),
            scale: blend_option(self.scale, other.scale, |a, b| utils::lerp_vec3(&a, &b, weight)),
        }
    }
}

fn blend_option<T>(a: Option<T>, b: Option<T>, mix: impl FnOnce(T, T) -> T) -> Option<T> {
    match (a, b) {
        (Some(a), Some(b)) => Some(mix(a, b)),
        (a, None) => a,
        (None, b) => b,
    }
}

/// 球面插值；两个旋转正好相反时没有唯一路径，取离 `t` 更近的一端
fn slerp(a: &Quaternion, b: &Quaternion, t: f32) -> Quaternion {
    a.try_slerp(b, t, 1.0e-6)
        .unwrap_or(if t < 0.5 { *a } else { *b })
}

/// 在有序关键帧上采样；时间落在首尾之外时取端点值
fn sample_track<T: Copy>(
    keys: &[Keyframe<T>],
    time: f32,
    interpolate: impl Fn(&T, &T, f32) -> T,
) -> Option<T> {
    let first = keys.first()?;
    if time <= first.time {
        return Some(first.value);
    }

    let next = keys.partition_point(|k| k.time <= time);
    if next == 0 {
        return Some(first.value);
    }
    if next >= keys.len() {
        return keys.last().map(|k| k.value);
    }

    let (a, b) = (&keys[next - 1], &keys[next]);
    let span = b.time - a.time;
    let t = if span > 0.0 { (time - a.time) / span } else { 0.0 };
    Some(interpolate(&a.value, &b.value, t))
}

/// 单个节点的关键帧通道
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeChannel {
    /// 目标节点名称
    pub node_name: String,
    pub positions: Vec<Keyframe<Vector3>>,
    pub rotations: Vec<Keyframe<Quaternion>>,
    pub scales: Vec<Keyframe<Vector3>>,
}

impl NodeChannel {
    pub fn new(node_name: impl Into<String>) -> Self {
        Self {
            node_name: node_name.into(),
            ..Default::default()
        }
    }

    pub fn sample(&self, time: f32) -> NodePose {
        NodePose {
            position: sample_track(&self.positions, time, |a, b, t| utils::lerp_vec3(a, b, t)),
            rotation: sample_track(&self.rotations, time, |a, b, t| slerp(a, b, t)),
            scale: sample_track(&self.scales, time, |a, b, t| utils::lerp_vec3(a, b, t)),
        }
    }
}

/// 整个层级在某一时刻的姿态，按节点名索引
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnimationPose {
    nodes: HashMap<String, NodePose>,
}

impl AnimationPose {
    pub fn get(&self, node_name: &str) -> Option<&NodePose> {
        self.nodes.get(node_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &NodePose)> {
        self.nodes.iter().map(|(name, pose)| (name.as_str(), pose))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// 按权重混合两个姿态，只在一侧出现的节点原样保留
    pub fn blend(&self, other: &AnimationPose, weight: f32) -> AnimationPose {
        let mut nodes = self.nodes.clone();
        for (name, pose) in &other.nodes {
            let blended = match nodes.get(name) {
                Some(current) => current.blend(pose, weight),
                None => *pose,
            };
            nodes.insert(name.clone(), blended);
        }
        AnimationPose { nodes }
    }
}

/// 动画片段
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    pub name: String,
    /// 时长（秒）
    pub duration: f32,
    pub channels: Vec<NodeChannel>,
}

impl AnimationClip {
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        Self {
            name: name.into(),
            duration,
            channels: Vec::new(),
        }
    }

    pub fn with_channel(mut self, channel: NodeChannel) -> Self {
        self.channels.push(channel);
        self
    }

    /// 把播放时间映射到片段时间：循环时取模，否则停在末尾；非有限时间回到开头
    pub fn local_time(&self, time: f32, looping: bool) -> f32 {
        if !time.is_finite() || !self.duration.is_finite() || self.duration <= 0.0 {
            0.0
        } else if looping {
            time.rem_euclid(self.duration)
        } else {
            time.clamp(0.0, self.duration)
        }
    }

    pub fn sample(&self, time: f32, looping: bool) -> AnimationPose {
        let local = self.local_time(time, looping);
        AnimationPose {
            nodes: self
                .channels
                .iter()
                .map(|c| (c.node_name.clone(), c.sample(local)))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk() -> AnimationClip {
        let mut channel = NodeChannel::new("Hip");
        channel.positions = vec![
            Keyframe::new(0.0, Vector3::zeros()),
            Keyframe::new(1.0, Vector3::new(2.0, 0.0, 0.0)),
        ];
        channel.rotations = vec![
            Keyframe::new(0.0, Quaternion::identity()),
            Keyframe::new(
                1.0,
                Quaternion::from_axis_angle(&Vector3::y_axis(), std::f32::consts::FRAC_PI_2),
            ),
        ];
        AnimationClip::new("Walk", 1.0).with_channel(channel)
    }

    #[test]
    fn test_sampling_interpolates() {
        let pose = walk().sample(0.5, false);
        let hip = pose.get("Hip").unwrap();

        assert!((hip.position.unwrap() - Vector3::new(1.0, 0.0, 0.0)).norm() < 1e-6);
        assert!((hip.rotation.unwrap().angle() - std::f32::consts::FRAC_PI_4).abs() < 1e-5);
        assert!(hip.scale.is_none());
    }

    #[test]
    fn test_local_time_loops_or_clamps() {
        let clip = walk();
        assert!((clip.local_time(1.25, true) - 0.25).abs() < 1e-6);
        assert_eq!(clip.local_time(1.25, false), 1.0);
        assert_eq!(clip.local_time(-1.0, false), 0.0);
    }

    #[test]
    fn test_non_finite_time_samples_first_key() {
        let clip = walk();
        for time in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            assert_eq!(clip.local_time(time, true), 0.0);
            assert_eq!(clip.local_time(time, false), 0.0);
            let pose = clip.sample(time, true);
            assert_eq!(pose.get("Hip").unwrap().position, Some(Vector3::zeros()));
        }

        let channel = &clip.channels[0];
        assert_eq!(channel.sample(f32::NAN).position, Some(Vector3::zeros()));
    }

    #[test]
    fn test_sampling_outside_keys_holds_ends() {
        let channel = &walk().channels[0];
        assert_eq!(channel.sample(-1.0).position, Some(Vector3::zeros()));
        assert_eq!(channel.sample(5.0).position, Some(Vector3::new(2.0, 0.0, 0.0)));
    }

    #[test]
    fn test_pose_blend() {
        let a = NodePose {
            position: Some(Vector3::zeros()),
            scale: Some(Vector3::repeat(1.0)),
            ..Default::default()
        };
        let b = NodePose {
            position: Some(Vector3::new(0.0, 4.0, 0.0)),
            rotation: Some(Quaternion::identity()),
            ..Default::default()
        };

        let blended = a.blend(&b, 0.25);
        assert_eq!(blended.position, Some(Vector3::new(0.0, 1.0, 0.0)));
        assert_eq!(blended.rotation, Some(Quaternion::identity()));
        assert_eq!(blended.scale, Some(Vector3::repeat(1.0)));
    }
}
