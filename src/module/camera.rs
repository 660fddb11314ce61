//! 编辑器相机模块
//!
//! 持有一个 [`Frustum`]，提供投影/视图矩阵并负责键盘漫游。
//! 场景绘制时用它的视锥体做包围盒裁剪。

use crate::core::config::{CameraSettings, Config};
use crate::core::input::{Input, KeyCode};
use crate::math::{frustum::horizontal_fov, utils::deg_to_rad, Frustum, Matrix4, Vector3};

/// 编辑器相机
#[derive(Debug, Clone)]
pub struct ModuleCamera {
    frustum: Frustum,

    /// 宽高比
    aspect_ratio: f32,

    /// 移动速度（单位/秒）
    pub move_speed: f32,
}

impl ModuleCamera {
    /// 创建相机：垂直视场角以弧度给出
    pub fn new(vertical_fov: f32, aspect_ratio: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            frustum: Frustum::default(),
            aspect_ratio,
            move_speed: 10.0,
        };
        camera.set_fov(vertical_fov);
        camera.set_plane_distances(near, far);
        camera
    }

    /// 由相机配置和窗口宽高比创建，配置中的视场角是度数
    pub fn from_settings(settings: &CameraSettings, aspect_ratio: f32) -> Self {
        let mut camera = Self::new(deg_to_rad(settings.fov), aspect_ratio, settings.near, settings.far);
        camera.move_speed = settings.move_speed;
        camera.set_position(Vector3::from(settings.position));
        camera.look_at(&Vector3::from(settings.target));
        camera
    }

    pub fn from_config(config: &Config) -> Self {
        Self::from_settings(&config.camera, config.window.aspect_ratio())
    }

    // ========== 视锥体属性 ==========

    pub fn frustum(&self) -> &Frustum {
        &self.frustum
    }

    pub fn position(&self) -> Vector3 {
        self.frustum.position
    }

    pub fn front(&self) -> Vector3 {
        self.frustum.front
    }

    pub fn up(&self) -> Vector3 {
        self.frustum.up
    }

    pub fn right(&self) -> Vector3 {
        self.frustum.right()
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    /// 设置垂直视场角（弧度），水平视场角随当前宽高比更新
    pub fn set_fov(&mut self, vertical_fov: f32) {
        self.frustum.vertical_fov = vertical_fov;
        self.frustum.horizontal_fov = horizontal_fov(vertical_fov, self.aspect_ratio);
    }

    /// 设置宽高比，保持垂直视场角
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
        self.frustum.horizontal_fov = horizontal_fov(self.frustum.vertical_fov, aspect_ratio);
    }

    pub fn set_plane_distances(&mut self, near: f32, far: f32) {
        self.frustum.near_plane_distance = near;
        self.frustum.far_plane_distance = far;
    }

    /// 窗口尺寸变化，高度为 0（最小化）时忽略
    pub fn on_window_resized(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            tracing::debug!(width, height, "Ignoring degenerate window size");
            return;
        }
        self.set_aspect_ratio(width as f32 / height as f32);
    }

    // ========== 位置与朝向 ==========

    pub fn set_position(&mut self, position: Vector3) {
        self.frustum.position = position;
    }

    /// 朝向 `target`，上向量按世界 Y 轴重新正交化
    ///
    /// 目标与当前位置重合或正好在正上/正下方时保持原朝向。
    pub fn look_at(&mut self, target: &Vector3) {
        let Some(front) = (target - self.frustum.position).try_normalize(1.0e-6) else {
            return;
        };
        let Some(right) = front.cross(&Vector3::y()).try_normalize(1.0e-6) else {
            return;
        };

        self.frustum.front = front;
        self.frustum.up = right.cross(&front).normalize();
    }

    /// 沿前向量移动
    pub fn walk(&mut self, distance: f32) {
        self.frustum.position += self.frustum.front * distance;
    }

    /// 沿右向量移动
    pub fn strafe(&mut self, distance: f32) {
        self.frustum.position += self.frustum.right() * distance;
    }

    /// 沿上向量移动
    pub fn fly(&mut self, distance: f32) {
        self.frustum.position += self.frustum.up * distance;
    }

    // ========== 矩阵 ==========

    pub fn projection_matrix(&self) -> Matrix4 {
        self.frustum.projection_matrix()
    }

    pub fn view_matrix(&self) -> Matrix4 {
        self.frustum.view_matrix()
    }

    /// 每帧根据按键漫游：W/S 前后，A/D 左右，Q/E 上下
    pub fn update(&mut self, input: &dyn Input, delta_time: f32) {
        let distance = self.move_speed * delta_time;
        let held = |key| input.key_state(key).is_held();

        if held(KeyCode::W) {
            self.walk(distance);
        }
        if held(KeyCode::S) {
            self.walk(-distance);
        }
        if held(KeyCode::D) {
            self.strafe(distance);
        }
        if held(KeyCode::A) {
            self.strafe(-distance);
        }
        if held(KeyCode::E) {
            self.fly(distance);
        }
        if held(KeyCode::Q) {
            self.fly(-distance);
        }
    }
}

impl Default for ModuleCamera {
    fn default() -> Self {
        Self::from_settings(&CameraSettings::default(), 16.0 / 9.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::KeyboardState;
    use crate::math::Aabb;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_horizontal_fov_follows_aspect() {
        let mut camera = ModuleCamera::new(deg_to_rad(90.0), 1.0, 0.1, 100.0);
        assert!(approx(camera.frustum().horizontal_fov, deg_to_rad(90.0)));

        camera.set_aspect_ratio(2.0);
        let expected = 2.0 * (2.0 * (deg_to_rad(90.0) * 0.5).tan()).atan();
        assert!(approx(camera.frustum().horizontal_fov, expected));
        assert!(approx(camera.frustum().vertical_fov, deg_to_rad(90.0)));
    }

    #[test]
    fn test_window_resize() {
        let mut camera = ModuleCamera::default();
        camera.on_window_resized(800, 400);
        assert!(approx(camera.aspect_ratio(), 2.0));
        assert!(approx(camera.frustum().aspect_ratio(), 2.0));

        camera.on_window_resized(800, 0);
        assert!(approx(camera.aspect_ratio(), 2.0));
    }

    #[test]
    fn test_look_at_faces_target() {
        let mut camera = ModuleCamera::default();
        camera.set_position(Vector3::new(0.0, 0.0, 10.0));
        camera.look_at(&Vector3::new(10.0, 0.0, 10.0));

        assert!((camera.front() - Vector3::x()).norm() < 1e-6);
        assert!((camera.up() - Vector3::y()).norm() < 1e-6);

        // 目标就在相机位置上：保持原朝向
        camera.look_at(&Vector3::new(0.0, 0.0, 10.0));
        assert!((camera.front() - Vector3::x()).norm() < 1e-6);
    }

    #[test]
    fn test_keyboard_movement() {
        let mut camera = ModuleCamera::default();
        camera.set_position(Vector3::zeros());
        camera.look_at(&Vector3::new(0.0, 0.0, -1.0));
        camera.move_speed = 2.0;

        let mut keyboard = KeyboardState::new();
        keyboard.press(KeyCode::W);
        keyboard.press(KeyCode::D);
        camera.update(&keyboard, 0.5);

        assert!((camera.position() - Vector3::new(1.0, 0.0, -1.0)).norm() < 1e-6);

        keyboard.release(KeyCode::W);
        keyboard.release(KeyCode::D);
        keyboard.press(KeyCode::E);
        camera.update(&keyboard, 0.5);
        assert!((camera.position() - Vector3::new(1.0, 1.0, -1.0)).norm() < 1e-6);
    }

    #[test]
    fn test_culling_through_camera_frustum() {
        let mut camera = ModuleCamera::default();
        camera.set_position(Vector3::zeros());
        camera.look_at(&Vector3::new(0.0, 0.0, -1.0));

        let ahead = Aabb::new(Vector3::new(-1.0, -1.0, -11.0), Vector3::new(1.0, 1.0, -9.0));
        let behind = Aabb::new(Vector3::new(-1.0, -1.0, 9.0), Vector3::new(1.0, 1.0, 11.0));
        assert!(camera.frustum().intersects_aabb(&ahead));
        assert!(!camera.frustum().intersects_aabb(&behind));
    }

    #[test]
    fn test_from_config() {
        let mut config = Config::default();
        config.camera.fov = 45.0;
        config.camera.position = [0.0, 0.0, 5.0];
        config.camera.target = [0.0, 0.0, 0.0];

        let camera = ModuleCamera::from_config(&config);
        assert!(approx(camera.frustum().vertical_fov, deg_to_rad(45.0)));
        assert!(approx(camera.aspect_ratio(), 1280.0 / 720.0));
        assert!((camera.front() - Vector3::new(0.0, 0.0, -1.0)).norm() < 1e-6);
        assert_eq!(camera.move_speed, config.camera.move_speed);
    }
}
