//! Drawing of the linkage and its foot trajectory.
//!
//! ```
//! use jansen::{plot::*, Linkage};
//!
//! let linkage = Linkage::canonical();
//! let fig = Figure::new()
//!     .joints(linkage.solve(0.))
//!     .trajectory(linkage.sample_trajectory(360));
//! let mut buf = String::new();
//! let svg = SVGBackend::with_string(&mut buf, (800, 600));
//! fig.plot(svg).unwrap();
//! ```
use crate::{JointName, JointSnapshot, LinkId, Trajectory};
#[doc(no_inline)]
pub use plotters::{prelude::*, *};

/// Result type of the drawing functions.
pub type PResult<T, B> = Result<T, DrawingAreaErrorKind<<B as DrawingBackend>::ErrorType>>;
/// Drawing area without coordinates.
pub type Canvas<B> = DrawingArea<B, coord::Shift>;

const BACKGROUND: RGBColor = RGBColor(30, 30, 30);
const GRID: RGBColor = RGBColor(64, 64, 64);
const TEXT: RGBColor = RGBColor(224, 224, 224);
const PATH: RGBColor = RGBColor(0, 191, 191);
const FOOT: RGBColor = RGBColor(255, 215, 0);
const FOOT_EDGE: RGBColor = RGBColor(255, 165, 0);

/// Color of a bar.
pub const fn bar_color(id: LinkId) -> RGBColor {
    match id {
        LinkId::Crank => RGBColor(255, 107, 107),
        LinkId::Coupler1 => RGBColor(78, 205, 196),
        LinkId::Coupler2 => RGBColor(69, 183, 209),
        LinkId::Rocker1 => RGBColor(150, 206, 180),
        LinkId::Coupler3 => RGBColor(255, 234, 167),
        LinkId::Rocker2 => RGBColor(223, 230, 233),
        LinkId::Ternary1 | LinkId::Ternary2 => RGBColor(250, 177, 160),
        LinkId::OffsetX | LinkId::OffsetY => GRID,
    }
}

/// Figure of the linkage at one crank angle, with its foot trajectory.
///
/// Both parts are optional. Unresolved joints and samples are left out of
/// the drawing, so the trajectory shows gaps where the solver failed.
#[derive(Clone, Debug, Default)]
pub struct Figure {
    joints: Option<JointSnapshot>,
    path: Option<Trajectory>,
    title: String,
}

impl Figure {
    /// Create an empty figure.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the linkage joints.
    pub fn joints(mut self, joints: JointSnapshot) -> Self {
        self.joints = Some(joints);
        self
    }

    /// Set the foot trajectory.
    pub fn trajectory(mut self, path: Trajectory) -> Self {
        self.path = Some(path);
        self
    }

    /// Set the title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    fn points(&self) -> impl Iterator<Item = [f64; 2]> + '_ {
        let joints = self.joints.iter().flat_map(|j| j.iter().filter_map(|(_, p)| p));
        let path = self.path.iter().flat_map(Trajectory::defined);
        joints.chain(path)
    }

    /// Square bounding box of all drawn points, with a margin.
    fn bounds(&self) -> [[f64; 2]; 2] {
        let [x_min, x_max, y_min, y_max] = self.points().fold(
            [f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY],
            |[x0, x1, y0, y1], [x, y]| [x0.min(x), x1.max(x), y0.min(y), y1.max(y)],
        );
        if x_min > x_max {
            return [[-1., 1.], [-1., 1.]];
        }
        let r = (x_max - x_min).max(y_max - y_min).max(f64::EPSILON) * 0.6;
        let [cx, cy] = [(x_min + x_max) / 2., (y_min + y_max) / 2.];
        [[cx - r, cx + r], [cy - r, cy + r]]
    }

    /// Draw the figure.
    pub fn plot<B, R>(&self, root: R) -> PResult<(), B>
    where
        B: DrawingBackend,
        Canvas<B>: From<R>,
    {
        let font = ("sans-serif", 16).into_font().color(&TEXT);
        let root = Canvas::from(root);
        root.fill(&BACKGROUND)?;
        let [[x0, x1], [y0, y1]] = self.bounds();
        let mut chart = ChartBuilder::on(&root);
        if !self.title.is_empty() {
            chart.caption(&self.title, ("sans-serif", 24).into_font().color(&TEXT));
        }
        let mut chart = chart
            .margin(12)
            .x_label_area_size(36)
            .y_label_area_size(48)
            .build_cartesian_2d(x0..x1, y0..y1)?;
        chart
            .configure_mesh()
            .bold_line_style(GRID)
            .light_line_style(BACKGROUND)
            .axis_style(GRID)
            .label_style(font.clone())
            .axis_desc_style(font.clone())
            .x_desc("x (mm)")
            .y_desc("y (mm)")
            .draw()?;
        // Ground
        chart.draw_series(LineSeries::new([(x0, 0.), (x1, 0.)], GRID.stroke_width(2)))?;
        let mut has_label = false;
        if let Some(path) = &self.path {
            let mut segments = path.segments();
            if path.gaps() == 0 {
                if let Some(seg) = segments.first_mut() {
                    if let Some(&first) = seg.first() {
                        seg.push(first);
                    }
                }
            }
            let style = PATH.stroke_width(2);
            for (i, seg) in segments.into_iter().enumerate() {
                let line = LineSeries::new(seg.into_iter().map(|[x, y]| (x, y)), style);
                let anno = chart.draw_series(line)?;
                if i == 0 {
                    anno.label("Foot trajectory").legend(move |(x, y)| {
                        PathElement::new([(x, y), (x + 20, y)], style)
                    });
                    has_label = true;
                }
            }
        }
        if let Some(joints) = &self.joints {
            for (id, [[px, py], [qx, qy]]) in joints.bars() {
                let style = bar_color(id).stroke_width(4);
                chart.draw_series(LineSeries::new([(px, py), (qx, qy)], style))?;
            }
            for (name, p) in joints.iter() {
                let Some([x, y]) = p else { continue };
                if name.is_fixed() {
                    let color = if name == JointName::A { RED } else { GREEN };
                    let mark = EmptyElement::at((x, y))
                        + Rectangle::new([(-7, -7), (7, 7)], color.filled());
                    chart.draw_series([mark])?;
                } else if name == JointName::F {
                    let mark = EmptyElement::at((x, y))
                        + Circle::new((0, 0), 9, FOOT.filled())
                        + Circle::new((0, 0), 9, FOOT_EDGE.stroke_width(2));
                    chart.draw_series([mark])?;
                } else {
                    chart.draw_series([Circle::new((x, y), 5, WHITE.filled())])?;
                }
            }
        }
        if has_label {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(BACKGROUND.mix(0.8))
                .border_style(GRID)
                .label_font(font)
                .draw()?;
        }
        Ok(())
    }
}
