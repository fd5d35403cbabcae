//! bar chart of monthly totals rendered into an `RgbImage`
//! one bar per bucket, dashed y grid, labels set in the embedded DejaVu Sans

use std::path::Path;

use ab_glyph::{FontRef, PxScale};
use image::{imageops, ImageBuffer, ImageFormat, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_line_segment_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use tracing::info;

use crate::error::ExportError;
use crate::stat::MonthlyBucket;

static FONT_DATA : &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");

pub const TITLE   : &str = "Monthly Sales Performance";
pub const X_LABEL : &str = "Month/Year";
pub const Y_LABEL : &str = "Total Revenue ($)";

pub const BACKGROUND : Rgb<u8> = Rgb([255, 255, 255]);
pub const BAR        : Rgb<u8> = Rgb([0x2E, 0x59, 0xFF]);
pub const AXIS       : Rgb<u8> = Rgb([0, 0, 0]);
pub const GRID       : Rgb<u8> = Rgb([190, 190, 190]);
pub const TEXT       : Rgb<u8> = Rgb([30, 30, 30]);

// nice_step yields about five ticks; anything past this is a broken scale
const MAX_TICKS : usize = 50;

/// image size; defaults to 10x6 inches at 300 dpi
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartOptions {
    pub width: u32,
    pub height: u32,
}

impl Default for ChartOptions {
    fn default() -> Self {
        ChartOptions { width: 3000, height: 1800 }
    }
}

/// pixel geometry of the plot area and the value axis
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Layout {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
    pub axis_min: f64,
    pub axis_max: f64,
    pub step: f64,
    /// base text height in pixels
    pub font_px: f32,
}

impl Layout {
    /// fails when the totals can't be placed on a finite axis
    pub fn new(opts: &ChartOptions, buckets: &[MonthlyBucket]) -> Result<Self, ExportError> {
        if buckets.iter().any(|b| !b.total_amount.is_finite()) {
            return Err(ExportError::NonFiniteTotal);
        }

        let w = opts.width;
        let h = opts.height;

        let lo = buckets.iter().map(|b| b.total_amount).fold(0.0_f64, f64::min);
        let hi = buckets.iter().map(|b| b.total_amount).fold(0.0_f64, f64::max);
        if !(hi - lo).is_finite() {
            return Err(ExportError::NonFiniteTotal);
        }
        let step = nice_step(hi - lo);

        let mut axis_min = (lo / step).floor() * step;
        let mut axis_max = (hi / step).ceil() * step;
        if axis_max <= axis_min {
            axis_min = 0.0;
            axis_max = step;
        }
        if !(axis_max - axis_min).is_finite() {
            return Err(ExportError::NonFiniteTotal);
        }

        Ok(Layout {
            left: w * 12 / 100,
            right: w - w * 4 / 100,
            top: h * 12 / 100,
            bottom: h - h * 16 / 100,
            axis_min,
            axis_max,
            step,
            font_px: (h as f32 / 40.0).max(8.0),
        })
    }

    /// y pixel of value `v`
    pub fn y_of(&self, v: f64) -> u32 {
        let span = (self.bottom - self.top) as f64;
        let frac = (v - self.axis_min) / (self.axis_max - self.axis_min);
        let y = self.bottom as f64 - frac.clamp(0.0, 1.0) * span;
        y.round() as u32
    }

    /// horizontal slot (start, width) of bar `i` out of `n`
    pub fn slot(&self, i: usize, n: usize) -> (u32, u32) {
        let width = (self.right - self.left) / n.max(1) as u32;
        (self.left + width * i as u32, width)
    }

    /// tick values from axis_min to axis_max, at most MAX_TICKS + 1 of them
    pub fn ticks(&self) -> Vec<f64> {
        let count = ((self.axis_max - self.axis_min) / self.step).round();
        let count = if count.is_finite() { (count as usize).min(MAX_TICKS) } else { 0 };

        (0..=count).map(|i| self.axis_min + i as f64 * self.step).collect()
    }
}

/// tick distance: 1, 2 or 5 times a power of ten, about five ticks per span
fn nice_step(span: f64) -> f64 {
    if !span.is_finite() || span <= 0.0 {
        return 1.0;
    }

    let raw = span / 5.0;
    let magnitude = 10_f64.powf(raw.log10().floor());
    let norm = raw / magnitude;

    let nice = if norm <= 1.0 {
        1.0
    } else if norm <= 2.0 {
        2.0
    } else if norm <= 5.0 {
        5.0
    } else {
        10.0
    };

    nice * magnitude
}

fn tick_label(v: f64, step: f64) -> String {
    if step >= 1.0 {
        format!("{:.0}", v)
    } else {
        format!("{:.2}", v)
    }
}

/// x axis label of a bucket, e.g. Nov/2025
pub fn month_label(bucket: &MonthlyBucket) -> String {
    bucket.month_end.format("%b/%Y").to_string()
}

fn font() -> Result<FontRef<'static>, ExportError> {
    FontRef::try_from_slice(FONT_DATA).map_err(|_| ExportError::Font)
}

/// filled rectangle between two corners in any order; empty spans draw nothing
fn fill_between(img: &mut RgbImage, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgb<u8>) {
    let (w, h) = (x0.abs_diff(x1), y0.abs_diff(y1));
    if w == 0 || h == 0 {
        return;
    }
    let rect = Rect::at(x0.min(x1) as i32, y0.min(y1) as i32).of_size(w, h);
    draw_filled_rect_mut(img, rect, color);
}

fn dashed_hline(img: &mut RgbImage, x0: u32, x1: u32, y: u32, thick: u32, color: Rgb<u8>) {
    let dash = 6 * thick;
    let gap = 4 * thick;
    let mut x = x0;

    while x < x1 {
        let end = (x + dash).min(x1);
        for t in 0..thick {
            let yy = (y + t) as f32;
            draw_line_segment_mut(img, (x as f32, yy), (end as f32, yy), color);
        }
        x += dash + gap;
    }
}

fn draw_centered(img: &mut RgbImage, font: &FontRef, px: f32, text: &str, center: u32, y: u32) {
    let (tw, _) = text_size(PxScale::from(px), font, text);
    let x = center.saturating_sub(tw / 2);
    draw_text_mut(img, TEXT, x as i32, y as i32, PxScale::from(px), font, text);
}

// rotated 90 degrees counter clockwise, reads bottom to top,
// centred vertically on `center_y`
fn draw_vertical(img: &mut RgbImage, font: &FontRef, px: f32, text: &str, x: u32, center_y: u32) {
    let scale = PxScale::from(px);
    let (tw, th) = text_size(scale, font, text);
    if tw == 0 || th == 0 {
        return;
    }

    let mut strip: RgbImage = ImageBuffer::from_pixel(tw, th + th / 2, BACKGROUND);
    draw_text_mut(&mut strip, TEXT, 0, 0, scale, font, text);
    let rotated = imageops::rotate270(&strip);

    let y = center_y.saturating_sub(tw / 2);
    imageops::overlay(img, &rotated, x as i64, y as i64);
}

/// render the chart; empty or non-finite input is an error
pub fn render(buckets: &[MonthlyBucket], opts: &ChartOptions) -> Result<RgbImage, ExportError> {
    if buckets.is_empty() {
        return Err(ExportError::NoData);
    }

    let lay = Layout::new(opts, buckets)?;
    let font = font()?;
    let mut img: RgbImage = ImageBuffer::from_pixel(opts.width, opts.height, BACKGROUND);
    let px = lay.font_px;
    let thick = (opts.height / 600).max(1);

    // grid and tick labels
    let tick_px = PxScale::from(px * 0.8);
    for tick in lay.ticks() {
        let y = lay.y_of(tick);
        dashed_hline(&mut img, lay.left, lay.right, y, thick, GRID);

        let label = tick_label(tick, lay.step);
        let (tw, th) = text_size(tick_px, &font, &label);
        let lx = lay.left.saturating_sub(tw + (px / 2.0) as u32);
        draw_text_mut(&mut img, TEXT, lx as i32, y.saturating_sub(th / 2) as i32,
                      tick_px, &font, &label);
    }

    // bars, growing up or down from the zero line
    let zero = lay.y_of(0.0);
    let label_y = lay.bottom + (px / 2.0) as u32;
    for (i, bucket) in buckets.iter().enumerate() {
        let (x, width) = lay.slot(i, buckets.len());
        let bar_w = width * 6 / 10;
        let bx = x + (width - bar_w) / 2;
        fill_between(&mut img, bx, zero, bx + bar_w, lay.y_of(bucket.total_amount), BAR);

        // shrink month labels that would run into the neighbouring slot
        let label = month_label(bucket);
        let mut lpx = px;
        while lpx > 6.0 && text_size(PxScale::from(lpx), &font, &label).0 > width {
            lpx *= 0.9;
        }
        draw_centered(&mut img, &font, lpx, &label, x + width / 2, label_y);
    }

    // axes
    fill_between(&mut img, lay.left.saturating_sub(thick), lay.top,
                 lay.left, lay.bottom + thick, AXIS);
    fill_between(&mut img, lay.left, lay.bottom, lay.right, lay.bottom + thick, AXIS);
    if zero != lay.bottom {
        fill_between(&mut img, lay.left, zero, lay.right, zero + thick, AXIS);
    }

    // title and axis labels
    let title_px = px * 1.4;
    let (_, title_h) = text_size(PxScale::from(title_px), &font, TITLE);
    let title_y = lay.top.saturating_sub(title_h) / 2;
    draw_centered(&mut img, &font, title_px, TITLE, opts.width / 2, title_y);

    let x_label_y = label_y + (px * 1.8) as u32;
    draw_centered(&mut img, &font, px, X_LABEL, (lay.left + lay.right) / 2, x_label_y);

    draw_vertical(&mut img, &font, px, Y_LABEL, (px / 2.0) as u32, (lay.top + lay.bottom) / 2);

    Ok(img)
}

/// render and write the chart as png to `path`
pub fn save<P: AsRef<Path>>(
    buckets: &[MonthlyBucket],
    opts: &ChartOptions,
    path: P,
) -> Result<(), ExportError> {
    let img = render(buckets, opts)?;
    img.save_with_format(path.as_ref(), ImageFormat::Png)?;
    info!(path = ?path.as_ref(), "chart saved");
    Ok(())
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::stat::aggregate;
    use crate::test;
    use crate::db::SalesStore;

    fn demo_buckets() -> Vec<MonthlyBucket>
    {
        let store = test::demo_memory_store();
        aggregate(&store.query_all().unwrap()).buckets
    }

    fn small() -> ChartOptions
    {
        ChartOptions { width: 600, height: 360 }
    }

    #[test]
    fn nice_step_works()
    {
        assert_eq!(nice_step(3650.), 1000.);
        assert_eq!(nice_step(100.), 20.);
        assert_eq!(nice_step(0.), 1.);
        assert_eq!(nice_step(f64::NAN), 1.);
    }

    #[test]
    fn layout_covers_totals()
    {
        let lay = Layout::new(&small(), &demo_buckets()).unwrap();
        assert_eq!(lay.axis_min, 0.);
        assert_eq!(lay.axis_max, 4000.);
        assert_eq!(lay.y_of(0.), lay.bottom);
        assert_eq!(lay.y_of(4000.), lay.top);
        assert_eq!(lay.ticks(), vec![0., 1000., 2000., 3000., 4000.]);
    }

    #[test]
    fn month_label_works()
    {
        assert_eq!(month_label(&demo_buckets()[0]), "Nov/2025");
    }

    #[test]
    fn embedded_font_loads()
    {
        let font = font().unwrap();
        let (w, h) = text_size(PxScale::from(20.0), &font, TITLE);
        assert!(w > 0 && h > 0);
    }

    #[test]
    fn bars_are_drawn()
    {
        let buckets = demo_buckets();
        let opts = small();
        let img = render(&buckets, &opts).unwrap();
        let lay = Layout::new(&opts, &buckets).unwrap();

        assert_eq!(img.dimensions(), (600, 360));

        for (i, bucket) in buckets.iter().enumerate()
        {
            let (x, width) = lay.slot(i, buckets.len());
            let cx = x + width / 2;
            // just inside the bar, above the axis
            let inside = (lay.y_of(bucket.total_amount) + lay.bottom) / 2;
            assert_eq!(*img.get_pixel(cx, inside), BAR);
        }

        // slot edges stay background above the bars
        let (x, _) = lay.slot(1, buckets.len());
        assert_eq!(*img.get_pixel(x + 1, lay.top + 5), BACKGROUND);
    }

    #[test]
    fn negative_totals_drop_below_zero()
    {
        let mut buckets = demo_buckets();
        buckets[1].total_amount = -500.;

        let opts = small();
        let img = render(&buckets, &opts).unwrap();
        let lay = Layout::new(&opts, &buckets).unwrap();
        assert!(lay.axis_min < 0.);

        let (x, width) = lay.slot(1, 2);
        let zero = lay.y_of(0.);
        let below = (zero + lay.y_of(-500.)) / 2;
        assert!(below > zero);
        assert_eq!(*img.get_pixel(x + width / 2, below), BAR);
    }

    #[test]
    fn empty_input_is_no_data()
    {
        assert!(matches!(render(&[], &small()), Err(ExportError::NoData)));
    }

    #[test]
    fn non_finite_totals_are_rejected()
    {
        let mut buckets = demo_buckets();
        buckets[1].total_amount = f64::INFINITY;
        assert!(matches!(render(&buckets, &small()),
                         Err(ExportError::NonFiniteTotal)));

        buckets[1].total_amount = f64::NAN;
        assert!(matches!(render(&buckets, &small()),
                         Err(ExportError::NonFiniteTotal)));

        // each total is finite but their spread isn't
        buckets[0].total_amount = f64::MAX;
        buckets[1].total_amount = -f64::MAX;
        assert!(matches!(render(&buckets, &small()),
                         Err(ExportError::NonFiniteTotal)));
    }

    #[test]
    fn huge_totals_keep_a_bounded_axis()
    {
        let mut buckets = demo_buckets();
        buckets[0].total_amount = 1e308;
        buckets[1].total_amount = 1.;

        match Layout::new(&small(), &buckets)
        {
            Ok(lay) => assert!(lay.ticks().len() <= MAX_TICKS + 1),
            Err(e) => assert!(matches!(e, ExportError::NonFiniteTotal)),
        }
    }

    #[test]
    fn save_writes_png()
    {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sales_chart.png");

        save(&demo_buckets(), &small(), &path).unwrap();

        let back = image::open(&path).unwrap();
        assert_eq!((back.width(), back.height()), (600, 360));
    }
}
