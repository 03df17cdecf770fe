use image::{Rgba, RgbaImage};
use img_tissue_core::prelude::*;

/// Draw destination triangles edges and vertices of mesh over image.
///
/// # Arguments
/// * `image` - Target image.
/// * `mesh` - Mesh to draw.
/// * `edge` - Edges color.
/// * `vertex` - Vertices color.
pub fn apply_mesh_on_image(
    image: &mut RgbaImage,
    mesh: &TissueMesh,
    edge: [u8; 4],
    vertex: [u8; 4],
) {
    for triangle in mesh.dst_area() {
        apply_line_on_image(image, triangle.a, triangle.b, edge);
        apply_line_on_image(image, triangle.b, triangle.c, edge);
        apply_line_on_image(image, triangle.c, triangle.a, edge);
    }
    for p in mesh.dst_points() {
        apply_point_on_image(image, *p, vertex);
    }
}

fn apply_point_on_image(image: &mut RgbaImage, point: Coord, color: [u8; 4]) {
    let x = point.x as isize;
    let y = point.y as isize;
    if x >= 0 && x < image.width() as _ && y >= 0 && y < image.height() as _ {
        image.put_pixel(x as _, y as _, Rgba(color));
    }
}

fn apply_line_on_image(image: &mut RgbaImage, from: Coord, to: Coord, color: [u8; 4]) {
    let fx = from.x as isize;
    let fy = from.y as isize;
    let tx = to.x as isize;
    let ty = to.y as isize;
    let dx = tx - fx;
    let dy = ty - fy;
    if dx == 0 && dy == 0 {
        return;
    }
    let w = dx.abs();
    let h = dy.abs();
    let dx = dx as Scalar;
    let dy = dy as Scalar;
    if w > h {
        let (fx, tx, fy, _) = paired_min_max(fx, tx, fy, ty);
        for x in fx..tx {
            let f = (x - fx) as Scalar / dx.abs();
            let y = fy + (dy.abs() * f * dy.signum() * dx.signum()) as isize;
            apply_point_on_image(image, Coord::new(x as _, y as _), color);
        }
    } else {
        let (fy, ty, fx, _) = paired_min_max(fy, ty, fx, tx);
        for y in fy..ty {
            let f = (y - fy) as Scalar / dy.abs();
            let x = fx + (dx.abs() * f * dx.signum() * dy.signum()) as isize;
            apply_point_on_image(image, Coord::new(x as _, y as _), color);
        }
    }
}

fn paired_min_max(a1: isize, b1: isize, a2: isize, b2: isize) -> (isize, isize, isize, isize) {
    if a1 < b1 {
        (a1, b1, a2, b2)
    } else {
        (b1, a1, b2, a2)
    }
}
