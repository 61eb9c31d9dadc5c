use pulse_client::schema::PricePoint;
use std::fmt::Write;

pub const WIDTH: f64 = 300.0;
pub const HEIGHT: f64 = 120.0;

/// Map a price series onto a `width` x `height` box as an open polyline.
///
/// `x` is linear in the index; `y` is the price normalized between the
/// observed min and max, inverted so a higher price sits higher on screen
/// (closer to `y = 0`). A flat series collapses onto `y = height`, and a
/// single point sits at `x = 0`.
pub fn polyline(series: &[PricePoint], width: f64, height: f64) -> Vec<(f64, f64)> {
    let Some(first) = series.first() else {
        return vec![];
    };

    let (min, max) = series
        .iter()
        .fold((first.price, first.price), |(min, max), point| {
            (min.min(point.price), max.max(point.price))
        });
    let range = if max - min == 0.0 { 1.0 } else { max - min };
    let steps = series.len().saturating_sub(1).max(1) as f64;

    series
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let x = i as f64 / steps * width;
            let y = height - (point.price - min) / range * height;
            (x, y)
        })
        .collect()
}

/// `"x,y x,y ..."`, the format of an SVG `points` attribute.
pub fn points_attr(points: &[(f64, f64)]) -> String {
    let mut attr = String::new();
    for (i, (x, y)) in points.iter().enumerate() {
        if i > 0 {
            attr.push(' ');
        }
        let _ = write!(attr, "{x},{y}");
    }
    attr
}

pub fn svg(series: &[PricePoint]) -> String {
    let points = polyline(series, WIDTH, HEIGHT);
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}"><polyline fill="none" stroke="blue" stroke-width="2" points="{}"/></svg>"#,
        points_attr(&points)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn series(prices: &[f64]) -> Vec<PricePoint> {
        prices
            .iter()
            .enumerate()
            .map(|(day, price)| PricePoint {
                time: DateTime::from_timestamp(1_711_843_200 + day as i64 * 86_400, 0).unwrap(),
                price: *price,
            })
            .collect()
    }

    #[test]
    fn empty_series_draws_nothing() {
        assert!(polyline(&[], WIDTH, HEIGHT).is_empty());
    }

    #[test]
    fn single_point_is_finite() {
        let points = polyline(&series(&[42.0]), WIDTH, HEIGHT);
        assert_eq!(points, vec![(0.0, HEIGHT)]);
    }

    #[test]
    fn flat_series_sits_on_the_baseline() {
        let points = polyline(&series(&[5.0, 5.0, 5.0, 5.0]), WIDTH, HEIGHT);
        assert_eq!(points.len(), 4);
        assert!(points.iter().all(|&(_, y)| y == HEIGHT));
    }

    #[test]
    fn rising_prices_climb_the_screen() {
        let points = polyline(&series(&[1.0, 2.0, 4.0, 8.0, 9.5]), WIDTH, HEIGHT);
        assert!(points.windows(2).all(|pair| pair[1].1 < pair[0].1));
        assert_eq!(points.first().unwrap().1, HEIGHT);
        assert_eq!(points.last().unwrap().1, 0.0);
    }

    #[test]
    fn x_spans_the_full_width() {
        let points = polyline(&series(&[3.0, 1.0, 2.0]), 300.0, 100.0);
        assert_eq!(points, vec![(0.0, 0.0), (150.0, 100.0), (300.0, 50.0)]);
    }

    #[test]
    fn svg_lists_points_in_order() {
        let svg = svg(&series(&[1.0, 2.0]));
        assert!(svg.contains(r#"points="0,120 300,0""#), "{svg}");
        assert!(svg.starts_with("<svg"));
    }
}
