use engine::{MapView, VIEWPORT_EXTENT};
use iced::widget::canvas::{self, Path, Stroke};
use iced::widget::{container, text};
use iced::{Color, Element, Length, Point, Rectangle, Size, Theme, mouse};

const MARKER_RADIUS: f32 = 5.0;
const PATH_COLOR: Color = Color::from_rgb(0.216, 0.431, 0.737);
const START_COLOR: Color = Color::from_rgb(0.478, 0.839, 0.431);
const END_COLOR: Color = Color::from_rgb(1.0, 0.369, 0.302);

/// Largest centered square that fits in `size`: `(origin, side)`.
fn viewport(size: Size) -> (Point, f32) {
    let side = size.width.min(size.height).max(0.0);
    let origin = Point::new((size.width - side) / 2.0, (size.height - side) / 2.0);
    (origin, side)
}

/// Maps a track point from the `[0, 100]` space into canvas coordinates.
///
/// The y axis points up in track space and down on screen.
///
/// # Example
///
/// ```ignore
/// let size = Size::new(200.0, 200.0);
/// assert_eq!(project_point(engine::Point::new(0.0, 0.0), size), Point::new(0.0, 200.0));
/// ```
pub fn project_point(point: engine::Point, size: Size) -> Point {
    let (origin, side) = viewport(size);
    let scale = side / VIEWPORT_EXTENT as f32;
    Point::new(
        origin.x + point.x as f32 * scale,
        origin.y + (VIEWPORT_EXTENT - point.y) as f32 * scale,
    )
}

#[derive(Debug)]
struct MapProgram<'a> {
    map: &'a MapView,
    cache: &'a canvas::Cache,
}

impl<Message> canvas::Program<Message> for MapProgram<'_> {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &iced::Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let paths = self.cache.draw(renderer, bounds.size(), |frame| {
            let size = frame.size();
            let (origin, side) = viewport(size);
            frame.fill(
                &Path::rectangle(origin, Size::new(side, side)),
                Color::from_rgb8(22, 24, 29),
            );

            for segment in &self.map.paths {
                let path = Path::new(|builder| {
                    let mut points = segment.iter().map(|point| project_point(*point, size));
                    if let Some(first) = points.next() {
                        builder.move_to(first);
                        for point in points {
                            builder.line_to(point);
                        }
                    }
                });
                frame.stroke(
                    &path,
                    Stroke::default().with_width(2.0).with_color(PATH_COLOR),
                );
            }
        });

        let mut marker_frame = canvas::Frame::new(renderer, bounds.size());
        if let Some(markers) = self.map.markers {
            let size = bounds.size();
            for (point, color) in [(markers.start, START_COLOR), (markers.end, END_COLOR)] {
                marker_frame.fill(
                    &Path::circle(project_point(point, size), MARKER_RADIUS),
                    color,
                );
            }
        }

        vec![paths, marker_frame.into_geometry()]
    }
}

/// Renders the selected track with its endpoint markers.
pub fn view<'a, Message>(map: Option<&'a MapView>, cache: &'a canvas::Cache) -> Element<'a, Message>
where
    Message: 'a,
{
    match map {
        Some(map) => canvas::Canvas::new(MapProgram { map, cache })
            .width(Length::Fill)
            .height(Length::Fill)
            .into(),
        None => container(text("No track selected"))
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into(),
    }
}
