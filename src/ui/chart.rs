/// Country distribution bar chart for the dashboard
use iced::widget::canvas;
use iced::{Color, Point, Rectangle, Size};

use crate::Message;

/// Bar fill, a coin-like gold that reads well on the dark theme
const BAR_COLOR: Color = Color {
    r: 0.85,
    g: 0.68,
    b: 0.28,
    a: 1.0,
};

const LABEL_COLOR: Color = Color::WHITE;

/// Width reserved for country names left of the bars
const LABEL_WIDTH: f32 = 130.0;

/// Width reserved for the count right of each bar
const COUNT_WIDTH: f32 = 36.0;

/// Horizontal bar chart of coins per country, largest first
#[derive(Debug, Clone)]
pub struct CountryChart {
    /// (country, coin count) pairs as produced by the aggregator
    pub slices: Vec<(String, usize)>,
}

impl canvas::Program<Message> for CountryChart {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &iced::Renderer,
        _theme: &iced::Theme,
        bounds: Rectangle,
        _cursor: iced::mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());

        if self.slices.is_empty() {
            return vec![frame.into_geometry()];
        }

        let max_count = self
            .slices
            .iter()
            .map(|(_, count)| *count)
            .max()
            .unwrap_or(1) as f32;

        let row_height = bounds.height / self.slices.len() as f32;
        let bar_height = (row_height * 0.55).min(26.0);
        let bar_area = (bounds.width - LABEL_WIDTH - COUNT_WIDTH).max(10.0);

        for (i, (country, count)) in self.slices.iter().enumerate() {
            let y = i as f32 * row_height;
            let bar_width = (*count as f32 / max_count) * bar_area;
            let bar_y = y + (row_height - bar_height) / 2.0;

            frame.fill_rectangle(
                Point::new(LABEL_WIDTH, bar_y),
                Size::new(bar_width, bar_height),
                BAR_COLOR,
            );

            frame.fill_text(canvas::Text {
                content: country.clone(),
                position: Point::new(0.0, y + row_height / 2.0),
                color: LABEL_COLOR,
                size: 14.0.into(),
                vertical_alignment: iced::alignment::Vertical::Center,
                ..canvas::Text::default()
            });

            frame.fill_text(canvas::Text {
                content: count.to_string(),
                position: Point::new(LABEL_WIDTH + bar_width + 8.0, y + row_height / 2.0),
                color: LABEL_COLOR,
                size: 14.0.into(),
                vertical_alignment: iced::alignment::Vertical::Center,
                ..canvas::Text::default()
            });
        }

        vec![frame.into_geometry()]
    }
}
