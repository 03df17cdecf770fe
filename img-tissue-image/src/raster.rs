use crate::settings::{RasterSettings, Sampling};
use image::{Rgba, RgbaImage};
use img_tissue_core::prelude::*;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[cfg(feature = "parallel")]
macro_rules! rows_mut {
    ($v:expr, $n:expr) => {
        $v.par_chunks_mut($n)
    };
}

#[cfg(not(feature = "parallel"))]
macro_rules! rows_mut {
    ($v:expr, $n:expr) => {
        $v.chunks_mut($n)
    };
}

#[derive(Debug, Clone, PartialEq)]
struct RasterTriangle {
    clip: Vec<Coord>,
    matrix: TextureMatrix,
}

impl Default for RasterTriangle {
    fn default() -> Self {
        Self {
            clip: vec![],
            matrix: TextureMatrix::IDENTITY,
        }
    }
}

/// Triangle ready for filling: inverse texture lookup plus clip edges.
struct Prepared {
    inverse: TextureMatrix,
    clip: Vec<Coord>,
    min: Coord,
    max: Coord,
}

impl Prepared {
    fn new(triangle: &RasterTriangle) -> Option<Self> {
        if triangle.clip.len() < 3 {
            return None;
        }
        let inverse = triangle.matrix.invert()?;
        let min = triangle.clip.iter().fold(
            Coord::new(Scalar::INFINITY, Scalar::INFINITY),
            |a, p| Coord::new(a.x.min(p.x), a.y.min(p.y)),
        );
        let max = triangle.clip.iter().fold(
            Coord::new(Scalar::NEG_INFINITY, Scalar::NEG_INFINITY),
            |a, p| Coord::new(a.x.max(p.x), a.y.max(p.y)),
        );
        Some(Self {
            inverse,
            clip: triangle.clip.clone(),
            min,
            max,
        })
    }

    /// Convex polygon test that accepts both windings.
    fn contains(&self, p: Coord) -> bool {
        let count = self.clip.len();
        let mut positive = false;
        let mut negative = false;
        for i in 0..count {
            let a = self.clip[i];
            let b = self.clip[(i + 1) % count];
            let side = (p - a).dot((b - a).right());
            if side > 0.0 {
                positive = true;
            } else if side < 0.0 {
                negative = true;
            }
            if positive && negative {
                return false;
            }
        }
        true
    }
}

/// CPU surface that maps texture triangles onto a canvas.
///
/// Every triangle node holds a clip polygon and a texture transform; [`RasterSurface::render`]
/// fills each clip with texture pixels looked up through the inverse transform.
///
/// # Examples
/// ```
/// use image::RgbaImage;
/// use img_tissue_core::prelude::*;
/// use img_tissue_image::RasterSurface;
///
/// let texture = RgbaImage::from_pixel(8, 8, image::Rgba([200, 10, 10, 255]));
/// let mut tissue = ImgTissue::new(RasterSurface::new(texture), FrameQueue::default());
/// tissue.set_image_size(8.0, 8.0).unwrap();
/// let canvas = tissue.surface_mut().render();
/// assert_eq!(canvas.get_pixel(3, 5).0, [200, 10, 10, 255]);
/// ```
#[derive(Debug, Clone)]
pub struct RasterSurface {
    texture: RgbaImage,
    canvas: RgbaImage,
    settings: RasterSettings,
    bounds: Option<SurfaceBounds>,
    title: String,
    triangles: Vec<RasterTriangle>,
}

impl RasterSurface {
    /// Create surface with default settings.
    ///
    /// # Arguments
    /// * `texture` - Image mapped onto triangles.
    pub fn new(texture: RgbaImage) -> Self {
        Self::with_settings(texture, RasterSettings::default())
    }

    pub fn with_settings(texture: RgbaImage, settings: RasterSettings) -> Self {
        let canvas = RgbaImage::from_pixel(
            texture.width(),
            texture.height(),
            Rgba(settings.background),
        );
        Self {
            texture,
            canvas,
            settings,
            bounds: None,
            title: String::new(),
            triangles: vec![],
        }
    }

    pub fn texture(&self) -> &RgbaImage {
        &self.texture
    }

    /// Last rendered canvas.
    pub fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    pub fn settings(&self) -> &RasterSettings {
        &self.settings
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Set on-screen placement. Without it the canvas is assumed to be shown 1:1 at origin.
    pub fn set_bounds(&mut self, bounds: SurfaceBounds) {
        self.bounds = Some(bounds);
    }

    /// Redraw canvas from current triangle nodes.
    pub fn render(&mut self) -> &RgbaImage {
        let background = self.settings.background;
        for pixel in self.canvas.pixels_mut() {
            pixel.0 = background;
        }
        let prepared = self
            .triangles
            .iter()
            .filter_map(Prepared::new)
            .collect::<Vec<_>>();
        let width = self.canvas.width() as usize;
        if width == 0 {
            return &self.canvas;
        }
        let texture = &self.texture;
        let sampling = self.settings.sampling;
        rows_mut!(self.canvas, width * 4)
            .enumerate()
            .for_each(|(y, row)| {
                let py = y as Scalar + 0.5;
                for triangle in &prepared {
                    if py < triangle.min.y || py > triangle.max.y {
                        continue;
                    }
                    let fx = triangle.min.x.floor().max(0.0) as usize;
                    let tx = (triangle.max.x.ceil().max(0.0) as usize).min(width);
                    for x in fx..tx {
                        let p = Coord::new(x as Scalar + 0.5, py);
                        if !triangle.contains(p) {
                            continue;
                        }
                        let uv = triangle.inverse.apply(p);
                        if let Some(color) = sample(texture, uv, sampling) {
                            blend(&mut row[(x * 4)..(x * 4 + 4)], color);
                        }
                    }
                }
            });
        &self.canvas
    }
}

impl RenderSurface for RasterSurface {
    type Handle = usize;

    fn set_view_box(&mut self, width: Scalar, height: Scalar) {
        let width = width.ceil().max(0.0) as u32;
        let height = height.ceil().max(0.0) as u32;
        if self.canvas.dimensions() != (width, height) {
            self.canvas = RgbaImage::from_pixel(width, height, Rgba(self.settings.background));
        }
    }

    fn clear_triangles(&mut self) {
        self.triangles.clear();
    }

    fn create_triangle(&mut self, _index: usize) -> Self::Handle {
        self.triangles.push(RasterTriangle::default());
        self.triangles.len() - 1
    }

    fn set_clip(&mut self, handle: Self::Handle, polygon: &[Coord]) {
        if let Some(triangle) = self.triangles.get_mut(handle) {
            triangle.clip.clear();
            triangle.clip.extend_from_slice(polygon);
        }
    }

    fn set_transform(&mut self, handle: Self::Handle, matrix: &TextureMatrix) {
        if let Some(triangle) = self.triangles.get_mut(handle) {
            triangle.matrix = *matrix;
        }
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_owned();
    }

    fn bounds(&self) -> SurfaceBounds {
        self.bounds.unwrap_or_else(|| {
            SurfaceBounds::new(
                0.0,
                0.0,
                self.canvas.width() as Scalar,
                self.canvas.height() as Scalar,
            )
        })
    }
}

/// Sample texture at texture space point, `None` outside of texture.
fn sample(texture: &RgbaImage, uv: Coord, sampling: Sampling) -> Option<[u8; 4]> {
    let w = texture.width() as Scalar;
    let h = texture.height() as Scalar;
    if uv.x < 0.0 || uv.y < 0.0 || uv.x >= w || uv.y >= h {
        return None;
    }
    match sampling {
        Sampling::Nearest => Some(texture.get_pixel(uv.x as u32, uv.y as u32).0),
        Sampling::Bilinear => {
            let max_x = texture.width() - 1;
            let max_y = texture.height() - 1;
            let fx = (uv.x - 0.5).max(0.0);
            let fy = (uv.y - 0.5).max(0.0);
            let x0 = (fx as u32).min(max_x);
            let y0 = (fy as u32).min(max_y);
            let x1 = (x0 + 1).min(max_x);
            let y1 = (y0 + 1).min(max_y);
            let tx = fx - x0 as Scalar;
            let ty = fy - y0 as Scalar;
            let a = texture.get_pixel(x0, y0).0;
            let b = texture.get_pixel(x1, y0).0;
            let c = texture.get_pixel(x0, y1).0;
            let d = texture.get_pixel(x1, y1).0;
            let mut result = [0; 4];
            for i in 0..4 {
                let top = a[i] as Scalar + (b[i] as Scalar - a[i] as Scalar) * tx;
                let bottom = c[i] as Scalar + (d[i] as Scalar - c[i] as Scalar) * tx;
                result[i] = (top + (bottom - top) * ty).round().clamp(0.0, 255.0) as u8;
            }
            Some(result)
        }
    }
}

/// Source-over blend of color onto RGBA pixel bytes.
fn blend(pixel: &mut [u8], color: [u8; 4]) {
    let sa = color[3] as Scalar / 255.0;
    if sa >= 1.0 {
        pixel.copy_from_slice(&color);
        return;
    }
    if sa <= 0.0 {
        return;
    }
    let da = pixel[3] as Scalar / 255.0;
    let oa = sa + da * (1.0 - sa);
    for i in 0..3 {
        let s = color[i] as Scalar / 255.0;
        let d = pixel[i] as Scalar / 255.0;
        let o = (s * sa + d * da * (1.0 - sa)) / oa;
        pixel[i] = (o * 255.0).round() as u8;
    }
    pixel[3] = (oa * 255.0).round() as u8;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| Rgba([x as u8, y as u8, 0, 255]))
    }

    #[test]
    fn test_identity_mesh_reproduces_texture() {
        let texture = gradient(40, 30);
        let mut surface = RasterSurface::with_settings(
            texture.clone(),
            RasterSettings {
                sampling: Sampling::Nearest,
                ..Default::default()
            },
        );
        let mut tissue = ImgTissue::new(&mut surface, FrameQueue::default());
        tissue.set_grid(GridSize::new(5, 3));
        tissue.set_image_size(40.0, 30.0).unwrap();
        drop(tissue);
        let canvas = surface.render();
        assert_eq!(canvas.dimensions(), (40, 30));
        assert_eq!(canvas.as_raw(), texture.as_raw());
    }

    #[test]
    fn test_collapsed_mesh_leaves_background() {
        let texture = gradient(20, 20);
        let mut tissue = ImgTissue::new(RasterSurface::new(texture), FrameQueue::default());
        tissue.set_image_size(20.0, 20.0).unwrap();
        tissue.zoom_in(Coord::new(10.0, 10.0), 10.0);
        let mut time = 0.0;
        while tissue.state() == AnimatorState::Animating {
            tissue.tick(time);
            time += 5.0;
        }
        let canvas = tissue.surface_mut().render();
        assert!(canvas.pixels().all(|p| p.0 == [0, 0, 0, 0]));
    }

    #[test]
    fn test_contains_both_windings() {
        let clip = vec![
            Coord::new(0.0, 0.0),
            Coord::new(10.0, 0.0),
            Coord::new(0.0, 10.0),
        ];
        let cw = Prepared::new(&RasterTriangle {
            clip: clip.clone(),
            matrix: TextureMatrix::IDENTITY,
        })
        .unwrap();
        let ccw = Prepared::new(&RasterTriangle {
            clip: clip.into_iter().rev().collect(),
            matrix: TextureMatrix::IDENTITY,
        })
        .unwrap();
        for prepared in [cw, ccw] {
            assert!(prepared.contains(Coord::new(2.0, 2.0)));
            assert!(!prepared.contains(Coord::new(8.0, 8.0)));
        }
    }

    #[test]
    fn test_bilinear_sampling() {
        let texture = RgbaImage::from_fn(2, 1, |x, _| Rgba([x as u8 * 200, 0, 0, 255]));
        assert_eq!(
            sample(&texture, Coord::new(1.0, 0.5), Sampling::Bilinear),
            Some([100, 0, 0, 255])
        );
        assert_eq!(
            sample(&texture, Coord::new(0.2, 0.5), Sampling::Nearest),
            Some([0, 0, 0, 255])
        );
        assert_eq!(sample(&texture, Coord::new(-0.1, 0.5), Sampling::Nearest), None);
    }

    #[test]
    fn test_blend_half_transparent() {
        let mut pixel = [0, 0, 255, 255];
        blend(&mut pixel, [255, 0, 0, 128]);
        assert_eq!(pixel[3], 255);
        assert!(pixel[0] > 120 && pixel[0] < 135);
        assert!(pixel[2] > 120 && pixel[2] < 135);
    }
}
