// Report domain model - Page geometry for exported documents

/// Page dimensions in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    pub const LETTER: PageSize = PageSize {
        width: 612.0,
        height: 792.0,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Where a scaled image lands on the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PagePlacement {
    pub scale: f64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Uniformly scale an image to fit the page and center it.
///
/// Returns `None` for a zero-sized image, which has no meaningful scale.
pub fn fit_to_page(image_width: u32, image_height: u32, page: PageSize) -> Option<PagePlacement> {
    if image_width == 0 || image_height == 0 {
        return None;
    }

    let image_width = f64::from(image_width);
    let image_height = f64::from(image_height);
    let scale = (page.width / image_width).min(page.height / image_height);
    let width = image_width * scale;
    let height = image_height * scale;

    Some(PagePlacement {
        scale,
        x: (page.width - width) / 2.0,
        y: (page.height - height) / 2.0,
        width,
        height,
    })
}
