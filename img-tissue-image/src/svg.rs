use crate::SurfaceError;
use img_tissue_core::prelude::*;
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
struct SvgTriangle {
    index: usize,
    clip: Vec<Coord>,
    matrix: TextureMatrix,
}

/// Surface that keeps an SVG scene: one clipped `<use>` of the image per triangle.
///
/// # Examples
/// ```
/// use img_tissue_core::prelude::*;
/// use img_tissue_image::SvgSurface;
///
/// let mut tissue = ImgTissue::new(SvgSurface::new("photo.png"), FrameQueue::default());
/// tissue.set_title("Photo & friends");
/// tissue.set_image_size(64.0, 32.0).unwrap();
/// let svg = tissue.surface().to_svg();
/// assert!(svg.contains(r#"viewBox="0 0 64 32""#));
/// assert!(svg.contains("<title id=\"title\">Photo &amp; friends</title>"));
/// assert_eq!(svg.matches("<clipPath").count(), 32);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SvgSurface {
    href: String,
    view_box: (Scalar, Scalar),
    bounds: Option<SurfaceBounds>,
    title: String,
    triangles: Vec<SvgTriangle>,
}

impl SvgSurface {
    /// Create surface referencing image by URL or path.
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            view_box: (0.0, 0.0),
            bounds: None,
            title: String::new(),
            triangles: vec![],
        }
    }

    pub fn href(&self) -> &str {
        &self.href
    }

    /// Set on-screen placement. Without it the view box is assumed to be shown 1:1 at origin.
    pub fn set_bounds(&mut self, bounds: SurfaceBounds) {
        self.bounds = Some(bounds);
    }

    /// Serialize scene into SVG document.
    pub fn to_svg(&self) -> String {
        let (width, height) = self.view_box;
        let mut result = String::with_capacity(256 + self.triangles.len() * 192);
        result.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" role="img" aria-labelledby="title">
  <defs><image href="{href}" id="image" x="0" y="0" width="{w}" height="{h}" /></defs>
  <title id="title">{title}</title>
"#,
            w = width,
            h = height,
            href = escape(&self.href),
            title = escape(&self.title),
        ));
        result.push_str("  <g id=\"texture\">\n");
        for triangle in &self.triangles {
            let points = triangle
                .clip
                .iter()
                .map(|p| format!("{},{}", p.x, p.y))
                .collect::<Vec<_>>()
                .join(" ");
            let matrix = triangle
                .matrix
                .coefficients()
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(" ");
            result.push_str(&format!(
                r##"    <g id="g-{i}" clip-path="url(#clip-{i})"><clipPath id="clip-{i}"><polygon points="{points}" /></clipPath><use id="tri-{i}" href="#image" transform="matrix({matrix})" /></g>
"##,
                i = triangle.index,
                points = points,
                matrix = matrix,
            ));
        }
        result.push_str("  </g>\n</svg>\n");
        result
    }

    /// Write SVG document to file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SurfaceError> {
        std::fs::write(path, self.to_svg())?;
        Ok(())
    }
}

impl RenderSurface for SvgSurface {
    type Handle = usize;

    fn set_view_box(&mut self, width: Scalar, height: Scalar) {
        self.view_box = (width, height);
    }

    fn clear_triangles(&mut self) {
        self.triangles.clear();
    }

    fn create_triangle(&mut self, index: usize) -> Self::Handle {
        self.triangles.push(SvgTriangle {
            index,
            clip: vec![],
            matrix: TextureMatrix::IDENTITY,
        });
        self.triangles.len() - 1
    }

    fn set_clip(&mut self, handle: Self::Handle, polygon: &[Coord]) {
        if let Some(triangle) = self.triangles.get_mut(handle) {
            triangle.clip = polygon.to_vec();
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
        self.bounds
            .unwrap_or_else(|| SurfaceBounds::new(0.0, 0.0, self.view_box.0, self.view_box.1))
    }
}

fn escape(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&apos;"),
            c => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_markup() {
        let mut tissue = ImgTissue::new(SvgSurface::new("a.png"), FrameQueue::default());
        tissue.set_grid(GridSize::new(2, 2));
        tissue.set_image_size(20.0, 20.0).unwrap();
        let svg = tissue.surface().to_svg();
        assert!(svg.contains(
            r##"<g id="g-0" clip-path="url(#clip-0)"><clipPath id="clip-0"><polygon points="-1,0 11,-1 11,11" /></clipPath><use id="tri-0" href="#image" transform="matrix(1 0 0 1 0 0)" /></g>"##
        ));
        assert!(svg.contains(r#"<polygon points="-1,-1 -1,11 11,10" />"#));
        assert!(svg.contains(r#"<g id="g-7""#));
        assert!(!svg.contains(r#"<g id="g-8""#));
    }

    #[test]
    fn test_document_layout() {
        let mut tissue = ImgTissue::new(SvgSurface::new("a.png"), FrameQueue::default());
        tissue.set_grid(GridSize::new(3, 2));
        tissue.set_title("t");
        tissue.set_image_size(30.0, 20.0).unwrap();
        let svg = tissue.surface().to_svg();
        let lines = svg.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 4 + 12 + 2);
        assert!(lines[0].starts_with("<svg "));
        assert_eq!(
            lines[1],
            r#"  <defs><image href="a.png" id="image" x="0" y="0" width="30" height="20" /></defs>"#
        );
        assert_eq!(lines[2], r#"  <title id="title">t</title>"#);
        assert_eq!(lines[3], r#"  <g id="texture">"#);
        assert!(lines[4..16].iter().all(|l| l.starts_with("    <g id=\"g-")));
        assert!(svg.ends_with("  </g>\n</svg>\n"));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&apos;&amp;&apos;&lt;/a&gt;");
    }

    #[test]
    fn test_default_bounds_follow_view_box() {
        let mut surface = SvgSurface::new("a.png");
        surface.set_view_box(300.0, 200.0);
        assert_eq!(surface.bounds(), SurfaceBounds::new(0.0, 0.0, 300.0, 200.0));
        surface.set_bounds(SurfaceBounds::new(5.0, 5.0, 150.0, 100.0));
        assert_eq!(surface.bounds().width, 150.0);
    }
}
