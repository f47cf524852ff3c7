use bevy::math::Vec2;

// wgpu refuses to configure a surface above the max texture extent
// ("Surface width and height must be within the maximum supported texture size").
const MAX_SURFACE_EXTENT: f32 = 2048.0;

pub fn clamp_surface_size(target: Vec2) -> Vec2 {
    target.min(Vec2::splat(MAX_SURFACE_EXTENT))
}

#[cfg(target_arch = "wasm32")]
pub fn handle_browser_resize(
    mut primary_query: bevy::ecs::system::Query<
        &mut bevy::window::Window,
        bevy::ecs::query::With<bevy::window::PrimaryWindow>,
    >,
) {
    let Some(wasm_window) = web_sys::window() else {
        return;
    };
    let (Ok(inner_width), Ok(inner_height)) = (wasm_window.inner_width(), wasm_window.inner_height())
    else {
        return;
    };
    let (Some(width), Some(height)) = (inner_width.as_f64(), inner_height.as_f64()) else {
        return;
    };
    let target = clamp_surface_size(Vec2::new(width as f32, height as f32));

    for mut window in &mut primary_query {
        let current = Vec2::new(window.resolution.width(), window.resolution.height());
        if current.abs_diff_eq(target, f32::EPSILON) {
            continue;
        }
        window.resolution.set(target.x, target.y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversized_browser_windows_are_clamped() {
        assert_eq!(
            clamp_surface_size(Vec2::new(1284.0, 2418.0)),
            Vec2::new(1284.0, 2048.0),
            "only the oversized axis is clamped"
        );
        assert_eq!(
            clamp_surface_size(Vec2::new(360.0, 640.0)),
            Vec2::new(360.0, 640.0),
            "phone sized windows are untouched"
        );
    }
}
