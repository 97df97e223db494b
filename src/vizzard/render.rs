// Drawing the results as standalone SVG documents.

use std::path::PathBuf;

use crate::vizzard::*;

const CHART_WIDTH: u32 = 600;
const CHART_HEIGHT: u32 = 400;
const CHART_BASE_MARGIN: u32 = 60;
const CHART_MAX_BAR: f64 = 200.0;
const BAR_WIDTH: u32 = 150;
const BAR_A_X: u32 = 100;
const BAR_B_X: u32 = 350;

const MAP_WIDTH: u32 = 900;
const MAP_HEIGHT: u32 = 600;
const DOT_SIZE: u32 = 5;

const COLOR_A: &str = "#00ff00";
const COLOR_B: &str = "#ff00ff";

/// What to draw. All the numbers are already computed.
#[derive(Debug)]
pub enum RenderRequest<'a> {
    ResultChart {
        popular: PopularTotals,
        electoral: ElectoralTotals,
        labels: &'a CandidateLabels,
    },
    CountyMap {
        counties: &'a [CountyRecord],
        /// Only the counties of this state are drawn, if set.
        focus_state: Option<StateId>,
        labels: &'a CandidateLabels,
    },
}

/// A drawing surface. Rendering never reports back to the caller.
pub trait Renderer {
    fn render(&self, request: &RenderRequest);
}

/// Writes each drawing as an SVG file in the output directory.
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    output_dir: String,
    map_image: String,
}

impl SvgRenderer {
    pub fn new(output_dir: &str, map_image: &str) -> SvgRenderer {
        SvgRenderer {
            output_dir: output_dir.to_string(),
            map_image: image_href(map_image),
        }
    }

    fn write_svg(&self, file_name: &str, svg: &str) -> VizzardResult<String> {
        let dir = Path::new(&self.output_dir);
        let path = dir.join(file_name).display().to_string();
        fs::create_dir_all(dir).context(WritingOutputSnafu {
            path: self.output_dir.clone(),
        })?;
        fs::write(&path, svg).context(WritingOutputSnafu { path: path.clone() })?;
        Ok(path)
    }
}

impl Renderer for SvgRenderer {
    fn render(&self, request: &RenderRequest) {
        let (file_name, svg) = match request {
            RenderRequest::ResultChart {
                popular,
                electoral,
                labels,
            } => (
                "results_chart.svg".to_string(),
                build_chart_svg(popular, electoral, labels),
            ),
            RenderRequest::CountyMap {
                counties,
                focus_state,
                labels,
            } => (
                map_file_name(focus_state.as_ref()),
                build_map_svg(counties, focus_state.as_ref(), labels, &self.map_image),
            ),
        };
        match self.write_svg(&file_name, &svg) {
            Ok(path) => info!("Visualization written to {:?}", path),
            Err(e) => error!("Failed to write visualization {:?}: {}", file_name, e),
        }
    }
}

/// The drawings are not written next to the inputs: the map image is
/// referenced by its absolute path.
fn image_href(map_image: &str) -> String {
    let absolute: PathBuf = match fs::canonicalize(map_image) {
        Ok(p) => p,
        Err(e) => {
            warn!("Map image {:?} not found: {}", map_image, e);
            match std::env::current_dir() {
                Ok(cwd) => cwd.join(map_image),
                Err(_) => PathBuf::from(map_image),
            }
        }
    };
    absolute.display().to_string()
}

fn map_file_name(focus_state: Option<&StateId>) -> String {
    match focus_state {
        None => "county_map_national.svg".to_string(),
        Some(sid) => {
            let cleaned: String = sid
                .as_str()
                .chars()
                .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
                .collect();
            format!("county_map_{}.svg", cleaned)
        }
    }
}

/// Heights of the bars of A and B, in pixels.
///
/// Both bars share the same scale: the largest sum of popular and electoral
/// votes of a candidate.
pub fn bar_heights(popular: &PopularTotals, electoral: &ElectoralTotals) -> (u32, u32) {
    let max_votes = popular
        .a
        .saturating_add(electoral.a)
        .max(popular.b.saturating_add(electoral.b));
    if max_votes == 0 {
        return (0, 0);
    }
    let height = |votes: u64| ((votes as f64 / max_votes as f64) * CHART_MAX_BAR) as u32;
    (height(popular.a), height(popular.b))
}

/// Projects a position on the continental map onto a canvas of the given size.
pub fn project(latitude: f64, longitude: f64, width: u32, height: u32) -> (i64, i64) {
    let x = (longitude + 125.0) * (width as f64 / 58.0);
    let y = (50.0 - latitude) * (height as f64 / 30.0);
    (x as i64, y as i64)
}

fn svg_text(svg: &mut String, x: u32, y: u32, text: &str) {
    svg.push_str(&format!(
        "<text x=\"{}\" y=\"{}\" font-family=\"sans-serif\" font-size=\"14\" font-weight=\"bold\">{}</text>\n",
        x,
        y,
        xml_escape(text)
    ));
}

pub fn build_chart_svg(
    popular: &PopularTotals,
    electoral: &ElectoralTotals,
    labels: &CandidateLabels,
) -> String {
    let base_y = CHART_HEIGHT - CHART_BASE_MARGIN;
    let (height_a, height_b) = bar_heights(popular, electoral);

    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
        w = CHART_WIDTH,
        h = CHART_HEIGHT
    );
    svg.push_str(&format!(
        "<title>{}</title>\n",
        xml_escape("The Vizzard: Election Results")
    ));
    svg_text(&mut svg, 80, 30, &format!("{} (Green)", labels.a));
    svg_text(&mut svg, 320, 30, &format!("{} (Magenta)", labels.b));
    for (x, h, color) in [(BAR_A_X, height_a, COLOR_A), (BAR_B_X, height_b, COLOR_B)] {
        svg.push_str(&format!(
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\"/>\n",
            x,
            base_y - h,
            BAR_WIDTH,
            h,
            color
        ));
    }
    svg_text(&mut svg, 200, base_y + 30, "Popular + EV Comparison");
    svg.push_str("</svg>\n");
    svg
}

pub fn build_map_svg(
    counties: &[CountyRecord],
    focus_state: Option<&StateId>,
    labels: &CandidateLabels,
    map_image: &str,
) -> String {
    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
        w = MAP_WIDTH,
        h = MAP_HEIGHT
    );
    svg.push_str(&format!(
        "<image href=\"{}\" x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" preserveAspectRatio=\"none\"/>\n",
        xml_escape(map_image),
        MAP_WIDTH,
        MAP_HEIGHT
    ));

    let mut num_drawn = 0;
    for county in counties
        .iter()
        .filter(|c| focus_state.map_or(true, |s| &c.state == s))
    {
        let (x, y) = project(county.latitude, county.longitude, MAP_WIDTH, MAP_HEIGHT);
        let color = match county.winner {
            Candidate::A => COLOR_A,
            Candidate::B => COLOR_B,
        };
        let r = DOT_SIZE as f64 / 2.0;
        svg.push_str(&format!(
            "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{}\"/>\n",
            x as f64 + r,
            y as f64 + r,
            r,
            color
        ));
        num_drawn += 1;
    }
    debug!(
        "build_map_svg: {} of {} counties drawn for {:?}",
        num_drawn,
        counties.len(),
        focus_state
    );

    let scope = match focus_state {
        Some(s) => s.to_string(),
        None => "National".to_string(),
    };
    svg_text(
        &mut svg,
        20,
        25,
        &format!(
            "{} County Results: {} (Green) vs {} (Magenta)",
            scope, labels.a, labels.b
        ),
    );
    svg_text(&mut svg, 20, 45, &format!("{} Counties (Green)", labels.a));
    svg_text(&mut svg, 20, 65, &format!("{} Counties (Magenta)", labels.b));
    svg.push_str("</svg>\n");
    svg
}

fn xml_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
