//! Integration tests for full-frame rendering

// Tests are allowed to use expect/unwrap for cleaner error messages
#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use glam::Vec3;
use marcher_core::Error;
use marcher_render::{
    CameraPose, InvSqrt, NormalEstimator, PixelView, RenderSettings, Renderer, render, render_raw,
};

/// Background formula for screen coordinate `v`
fn background(v: f32) -> [u8; 4] {
    let t = (v + 1.0) * 0.5;
    [
        (25.0 + t * 15.0) as u8,
        (25.0 + t * 20.0) as u8,
        (40.0 + t * 30.0) as u8,
        255,
    ]
}

/// Vertical screen coordinate of row `py`
fn row_v(py: usize, height: usize) -> f32 {
    1.0 - py as f32 * (1.0 / height as f32) * 2.0
}

fn render_default(width: usize, height: usize, pose: &CameraPose) -> Vec<u8> {
    let mut buf = vec![0u8; width * height * 4];
    let mut view = PixelView::packed(&mut buf, width, height).expect("valid view");
    render(&mut view, pose);
    buf
}

fn pixel(buf: &[u8], width: usize, x: usize, y: usize) -> [u8; 4] {
    let i = (y * width + x) * 4;
    [buf[i], buf[i + 1], buf[i + 2], buf[i + 3]]
}

#[test]
fn sphere_straight_ahead_hits_center() {
    let pose = CameraPose::new(Vec3::new(0.0, 0.0, 5.0), 0.0, 0.0);
    let buf = render_default(64, 64, &pose);

    let center = pixel(&buf, 64, 32, 32);
    assert_ne!(center, background(row_v(32, 64)), "center should hit the sphere");
    assert_eq!(center[3], 255);

    // The sphere faces +Z; the light has a positive Z component, so the
    // center is lit above the ambient floor
    assert!(center[0] > 33);
}

#[test]
fn top_corners_see_background() {
    let pose = CameraPose::new(Vec3::new(0.0, 0.0, 5.0), 0.0, 0.0);
    let buf = render_default(64, 64, &pose);

    assert_eq!(pixel(&buf, 64, 0, 0), background(1.0));
    assert_eq!(pixel(&buf, 64, 63, 0), background(1.0));
}

#[test]
fn bottom_corners_see_lit_ground() {
    let pose = CameraPose::new(Vec3::new(0.0, 0.0, 5.0), 0.0, 0.0);
    let buf = render_default(64, 64, &pose);

    // Ground normal is +Y: intensity = 0.15 + 0.85 * 0.80812
    for x in [0, 63] {
        let [r, g, b, a] = pixel(&buf, 64, x, 63);
        assert!((183..=185).contains(&r), "r = {r}");
        assert!((99..=101).contains(&g), "g = {g}");
        assert!((65..=67).contains(&b), "b = {b}");
        assert_eq!(a, 255);
    }
}

#[test]
fn camera_far_away_and_facing_away_sees_only_background() {
    // 50 units up, looking away from the scene along +Z; every ray is level
    // or rising, and the nearest surface is beyond the far plane
    let pose = CameraPose::new(Vec3::new(0.0, 50.0, 0.0), std::f32::consts::PI, 0.0);
    let buf = render_default(2, 2, &pose);

    for y in 0..2 {
        for x in 0..2 {
            assert_eq!(pixel(&buf, 2, x, y), background(row_v(y, 2)), "pixel ({x}, {y})");
        }
    }
    assert_eq!(pixel(&buf, 2, 0, 0), background(1.0));
}

#[test]
fn every_pixel_is_opaque() {
    let pose = CameraPose::orbit(Vec3::ZERO, 5.0, 1.5, 0.6);
    let buf = render_default(40, 30, &pose);
    assert!(buf.chunks_exact(4).all(|px| px[3] == 255));
}

#[test]
fn rendering_twice_is_byte_identical() {
    let pose = CameraPose::new(Vec3::new(1.0, 0.5, 4.0), 0.2, -0.1);
    let a = render_default(48, 32, &pose);
    let b = render_default(48, 32, &pose);
    assert_eq!(a, b);
}

#[test]
fn thread_count_does_not_change_output() {
    let pose = CameraPose::orbit(Vec3::new(1.0, 0.0, 0.0), 5.0, 1.0, 0.4);

    let single = Renderer::new(RenderSettings::default().with_threads(1)).unwrap();
    let many = Renderer::new(RenderSettings::default().with_threads(4)).unwrap();

    let a = single.render_image(57, 41, &pose).unwrap();
    let b = many.render_image(57, 41, &pose).unwrap();
    assert_eq!(a.as_raw(), b.as_raw());
}

#[test]
fn rows_per_task_does_not_change_output() {
    let pose = CameraPose::default();
    let one = Renderer::new(RenderSettings {
        rows_per_task: 1,
        ..Default::default()
    })
    .unwrap();
    let seven = Renderer::new(RenderSettings {
        rows_per_task: 7,
        ..Default::default()
    })
    .unwrap();

    assert_eq!(
        one.render_image(33, 20, &pose).unwrap().as_raw(),
        seven.render_image(33, 20, &pose).unwrap().as_raw()
    );
}

#[test]
fn renderer_matches_free_function() {
    let pose = CameraPose::new(Vec3::new(0.5, 0.2, 4.5), -0.15, 0.05);
    let expected = render_default(30, 20, &pose);
    let img = Renderer::new(RenderSettings::default())
        .unwrap()
        .render_image(30, 20, &pose)
        .unwrap();
    assert_eq!(img.as_raw(), &expected);
}

#[test]
fn stride_padding_is_left_untouched() {
    let (width, height, stride) = (5, 3, 5 * 4 + 8);
    let mut buf = vec![0xAB_u8; height * stride];
    {
        let mut view = PixelView::new(&mut buf, width, height, stride).unwrap();
        render(&mut view, &CameraPose::default());
    }

    for row in buf.chunks_exact(stride) {
        assert!(row[..width * 4].chunks_exact(4).all(|px| px[3] == 255));
        assert!(row[width * 4..].iter().all(|&b| b == 0xAB));
    }
}

#[test]
fn padded_and_packed_buffers_agree() {
    let pose = CameraPose::default();
    let (width, height, stride) = (9, 6, 9 * 4 + 12);
    let packed = render_default(width, height, &pose);

    let mut padded = vec![0u8; height * stride];
    render_raw(&mut padded, width as i32, height as i32, stride, 0.0, 0.0, 5.0, 0.0, 0.0);

    for y in 0..height {
        assert_eq!(
            &padded[y * stride..y * stride + width * 4],
            &packed[y * width * 4..(y + 1) * width * 4]
        );
    }
}

#[test]
fn render_raw_ignores_invalid_dimensions() {
    let mut buf = vec![7u8; 64];
    render_raw(&mut buf, 0, 4, 16, 0.0, 0.0, 5.0, 0.0, 0.0);
    render_raw(&mut buf, 4, -1, 16, 0.0, 0.0, 5.0, 0.0, 0.0);
    render_raw(&mut buf, -3, -3, 16, 0.0, 0.0, 5.0, 0.0, 0.0);
    // Stride too short for the width
    render_raw(&mut buf, 4, 4, 8, 0.0, 0.0, 5.0, 0.0, 0.0);
    // Buffer too short for the height
    render_raw(&mut buf, 4, 8, 16, 0.0, 0.0, 5.0, 0.0, 0.0);
    assert!(buf.iter().all(|&b| b == 7));

    render_raw(&mut buf, 4, 4, 16, 0.0, 0.0, 5.0, 0.0, 0.0);
    assert!(buf.chunks_exact(4).all(|px| px[3] == 255));
}

#[test]
fn render_image_rejects_empty_image() {
    let renderer = Renderer::new(RenderSettings::default()).unwrap();
    let err = renderer.render_image(0, 10, &CameraPose::default()).unwrap_err();
    assert!(matches!(err, Error::InvalidDimensions { .. }));
}

#[test]
fn invalid_settings_are_rejected() {
    let result = Renderer::new(RenderSettings {
        max_steps: 0,
        ..Default::default()
    });
    assert!(matches!(result, Err(Error::InvalidParameter(_))));
}

#[test]
fn fast_inv_sqrt_still_hits_center() {
    let renderer =
        Renderer::new(RenderSettings::default().with_inv_sqrt(InvSqrt::Fast)).unwrap();
    let img = renderer
        .render_image(64, 64, &CameraPose::new(Vec3::new(0.0, 0.0, 5.0), 0.0, 0.0))
        .unwrap();
    let center = img.get_pixel(32, 32).0;
    assert_ne!(center, background(row_v(32, 64)));
    assert_eq!(img.get_pixel(0, 0).0, background(1.0));
}

#[test]
fn forward_difference_normals_shade_close_to_central() {
    let pose = CameraPose::new(Vec3::new(0.0, 0.0, 5.0), 0.0, 0.0);
    let central = Renderer::new(RenderSettings::default()).unwrap();
    let forward =
        Renderer::new(RenderSettings::default().with_normals(NormalEstimator::ForwardDifference))
            .unwrap();

    let a = central.render_image(32, 32, &pose).unwrap();
    let b = forward.render_image(32, 32, &pose).unwrap();

    // Both schemes see the same hit points; only the shading differs. Edges
    // of the box can flip a few pixels, the rest must stay close.
    let differing = a
        .pixels()
        .zip(b.pixels())
        .filter(|(x, y)| x.0.iter().zip(y.0.iter()).any(|(p, q)| p.abs_diff(*q) > 4))
        .count();
    assert!(differing * 20 < 32 * 32, "{differing} pixels differ");
}

#[test]
fn stats_count_every_pixel() {
    let renderer = Renderer::new(RenderSettings::default()).unwrap();
    let mut img = image::RgbaImage::new(16, 12);
    let stats = {
        let mut view = PixelView::from_image(&mut img).unwrap();
        renderer.render(&mut view, &CameraPose::default())
    };
    assert_eq!(stats.pixels, 16 * 12);
    assert!(stats.hits > 0 && stats.hits < stats.pixels);
    assert!(stats.march_steps >= stats.pixels);
    // Central differences: six evaluations per hit
    assert_eq!(stats.normal_evaluations, stats.hits * 6);
    assert_eq!(stats.field_evaluations(), stats.march_steps + stats.hits * 6);
}

#[test]
fn render_to_file_writes_png() {
    let dir = std::env::temp_dir().join(format!("marcher_test_{}", std::process::id()));
    let path = dir.join("frame.png");

    let renderer = Renderer::new(RenderSettings::default()).unwrap();
    let stats = renderer
        .render_to_file(&path, 24, 16, &CameraPose::default())
        .expect("render and save");
    assert_eq!(stats.pixels, 24 * 16);

    let loaded = image::open(&path).expect("read back").to_rgba8();
    let expected = renderer.render_image(24, 16, &CameraPose::default()).unwrap();
    assert_eq!(loaded.as_raw(), expected.as_raw());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn render_to_file_rejects_unknown_format() {
    let path = std::env::temp_dir().join("marcher_test_frame.unknownext");
    let renderer = Renderer::new(RenderSettings::default()).unwrap();
    let err = renderer
        .render_to_file(&path, 8, 8, &CameraPose::default())
        .unwrap_err();
    assert!(matches!(err, Error::Image(_)));
}

#[test]
fn huge_rows_per_task_renders_as_one_task() {
    let pose = CameraPose::default();
    let expected = render_default(8, 8, &pose);

    for rows_per_task in [usize::MAX / 2, usize::MAX] {
        let renderer = Renderer::new(RenderSettings {
            rows_per_task,
            ..Default::default()
        })
        .unwrap();
        let img = renderer.render_image(8, 8, &pose).unwrap();
        assert_eq!(img.as_raw(), &expected, "rows_per_task = {rows_per_task}");
    }
}

#[test]
fn composed_scene_renders_like_demo_scene() {
    use marcher_core::sdf::{Box3, Plane, SdfExt, Sphere};
    use marcher_render::Environment;

    let composed = Sphere::new(Vec3::ZERO, 1.0)
        .smooth_union(Box3::new(Vec3::new(2.0, 0.0, 0.0), Vec3::splat(0.4)), 0.3)
        .union(Plane::new(-1.5));

    let pose = CameraPose::orbit(Vec3::new(1.0, 0.0, 0.0), 5.0, 1.5, 0.4);
    let generic =
        Renderer::with_scene(composed, RenderSettings::default(), Environment::default()).unwrap();
    let demo = Renderer::new(RenderSettings::default()).unwrap();

    assert_eq!(
        generic.render_image(40, 30, &pose).unwrap().as_raw(),
        demo.render_image(40, 30, &pose).unwrap().as_raw()
    );
}
