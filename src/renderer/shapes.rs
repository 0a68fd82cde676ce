//! Optotype geometry and mirrored-pair layout
//!
//! The optotype is a ring with a gap opening toward +x (a Landolt C). It is a
//! static asset: the engine only supplies scale, offset and rotation.

use glam::{Affine2, Vec2};
use std::f32::consts::TAU;

use super::vertex::Vertex;
use crate::consts::{GAP_HALF_HEIGHT, R_IN, R_OUT};
use crate::sim::FrameOutput;

/// Closed outline of the optotype in shape units, centered on the origin.
///
/// Runs along the outer arc, across the lower gap edge, back along the inner
/// arc and across the upper gap edge.
pub fn optotype_outline(arc_segments: u32) -> Vec<Vec2> {
    let segments = arc_segments.max(4);
    let r_out = R_OUT as f32;
    let r_in = R_IN as f32;
    let gap = GAP_HALF_HEIGHT as f32;

    let outer_start = (gap / r_out).asin();
    let inner_start = (gap / r_in).asin();

    let mut points = Vec::with_capacity(2 * (segments as usize + 1));

    for i in 0..=segments {
        let t = i as f32 / segments as f32;
        let theta = outer_start + t * (TAU - 2.0 * outer_start);
        points.push(Vec2::new(r_out * theta.cos(), r_out * theta.sin()));
    }
    for i in (0..=segments).rev() {
        let t = i as f32 / segments as f32;
        let theta = inner_start + t * (TAU - 2.0 * inner_start);
        points.push(Vec2::new(r_in * theta.cos(), r_in * theta.sin()));
    }

    points
}

/// Left and right transforms for a frame (pixel space, y up).
///
/// Both shapes share scale and rotation; only the offset is mirrored.
/// Positive rotation is clockwise on screen.
pub fn pair_transforms(frame: &FrameOutput) -> [Affine2; 2] {
    let scale = Vec2::splat(frame.scale as f32);
    let angle = -(frame.rotation_deg as f32).to_radians();
    let offset = frame.offset_x as f32;
    [
        Affine2::from_scale_angle_translation(scale, angle, Vec2::new(-offset, 0.0)),
        Affine2::from_scale_angle_translation(scale, angle, Vec2::new(offset, 0.0)),
    ]
}

/// Stroke a closed polyline into triangles, `width` in output units
pub fn stroke_closed(
    points: &[Vec2],
    transform: &Affine2,
    width: f32,
    color: [f32; 4],
) -> Vec<Vertex> {
    if points.len() < 2 {
        return Vec::new();
    }

    let half = width / 2.0;
    let mut vertices = Vec::with_capacity(points.len() * 6);

    for i in 0..points.len() {
        let p1 = transform.transform_point2(points[i]);
        let p2 = transform.transform_point2(points[(i + 1) % points.len()]);

        let dir = (p2 - p1).normalize_or_zero();
        // Extend each segment by half the width so joints overlap
        let a = p1 - dir * half;
        let b = p2 + dir * half;
        let perp = Vec2::new(-dir.y, dir.x) * half;

        let a1 = a + perp;
        let a2 = a - perp;
        let b1 = b + perp;
        let b2 = b - perp;

        // Two triangles
        vertices.push(Vertex::new(a1.x, a1.y, color));
        vertices.push(Vertex::new(a2.x, a2.y, color));
        vertices.push(Vertex::new(b1.x, b1.y, color));

        vertices.push(Vertex::new(b1.x, b1.y, color));
        vertices.push(Vertex::new(a2.x, a2.y, color));
        vertices.push(Vertex::new(b2.x, b2.y, color));
    }

    vertices
}

/// Vertices for both optotypes of a frame, in pixels relative to the
/// canvas center. `pixel_ratio` converts CSS pixels to device pixels.
pub fn frame_vertices(
    frame: &FrameOutput,
    outline: &[Vec2],
    line_width: f32,
    pixel_ratio: f32,
    color: [f32; 4],
) -> Vec<Vertex> {
    let device = Affine2::from_scale(Vec2::splat(pixel_ratio));
    pair_transforms(frame)
        .iter()
        .flat_map(|t| stroke_closed(outline, &(device * *t), line_width * pixel_ratio, color))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::PhaseMode;

    fn frame(scale: f64, offset_x: f64, rotation_deg: f64) -> FrameOutput {
        FrameOutput {
            scale,
            offset_x,
            rotation_deg,
            mode: PhaseMode::Parallel,
        }
    }

    #[test]
    fn test_outline_radii() {
        let outline = optotype_outline(32);
        assert_eq!(outline.len(), 2 * 33);
        for p in &outline[..33] {
            assert!((p.length() - R_OUT as f32).abs() < 1e-3);
        }
        for p in &outline[33..] {
            assert!((p.length() - R_IN as f32).abs() < 1e-3);
        }
    }

    #[test]
    fn test_outline_gap_faces_right() {
        let outline = optotype_outline(64);
        let gap = GAP_HALF_HEIGHT as f32;
        // No outline point lies inside the gap opening
        for p in &outline {
            assert!(!(p.x > 0.0 && p.y.abs() < gap - 1e-3));
        }
        // Gap edges sit exactly at the gap half height
        assert!((outline[0].y - gap).abs() < 1e-3);
        assert!((outline[outline.len() - 1].y - gap).abs() < 1e-3);
    }

    #[test]
    fn test_pair_is_mirrored() {
        let [left, right] = pair_transforms(&frame(2.0, 250.5, 0.0));
        let l = left.transform_point2(Vec2::ZERO);
        let r = right.transform_point2(Vec2::ZERO);
        assert!((l.x + 250.5).abs() < 1e-4);
        assert!((r.x - 250.5).abs() < 1e-4);

        let edge = right.transform_point2(Vec2::new(R_OUT as f32, 0.0));
        assert!((edge.x - (250.5 + 200.0)).abs() < 1e-3);
    }

    #[test]
    fn test_full_size_pair_does_not_touch() {
        // separation 400 -> max scale 2, offset 200.5
        let [left, right] = pair_transforms(&frame(2.0, 200.5, 0.0));
        let left_edge = left.transform_point2(Vec2::new(R_OUT as f32, 0.0));
        let right_edge = right.transform_point2(Vec2::new(-(R_OUT as f32), 0.0));
        assert!(right_edge.x - left_edge.x > 0.0);
    }

    #[test]
    fn test_rotation_is_clockwise() {
        let [_, right] = pair_transforms(&frame(1.0, 0.0, 90.0));
        let p = right.transform_point2(Vec2::new(1.0, 0.0));
        assert!(p.x.abs() < 1e-5);
        assert!((p.y + 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_stroke_vertex_count() {
        let outline = optotype_outline(16);
        let verts = stroke_closed(&outline, &Affine2::IDENTITY, 2.0, [1.0; 4]);
        assert_eq!(verts.len(), outline.len() * 6);
        assert!(stroke_closed(&outline[..1], &Affine2::IDENTITY, 2.0, [1.0; 4]).is_empty());
    }

    #[test]
    fn test_frame_vertices_scaled_by_pixel_ratio() {
        let outline = optotype_outline(16);
        let f = frame(1.0, 300.0, 0.0);
        let verts = frame_vertices(&f, &outline, 2.0, 2.0, [1.0; 4]);
        assert_eq!(verts.len(), 2 * outline.len() * 6);
        let max_x = verts
            .iter()
            .map(|v| v.position[0])
            .fold(f32::MIN, f32::max);
        // (300 + 100) * 2, plus stroke overhang
        assert!(max_x > 790.0 && max_x < 810.0);
    }
}
