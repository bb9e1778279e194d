//! Segment-versus-polygon query command

use anyhow::{bail, Result};
use starfall_collision::{Collision2d, Point2d, Shape2d};

pub fn run(segment: [f64; 4], polygon: &[[f64; 2]]) -> Result<()> {
    let [x1, y1, x2, y2] = segment;
    let shapes = [
        Shape2d::linesegment(Point2d::new(x1, y1), Point2d::new(x2, y2), "segment"),
        Shape2d::polygon(
            polygon.iter().map(|&[x, y]| Point2d::new(x, y)).collect(),
            "polygon",
        ),
    ];
    let [seg, poly] = &shapes;

    let hits = Collision2d::try_test(seg, [poly])?;
    let inside = Collision2d::try_inside(seg, [poly])?;
    let Some(&inside) = inside.first() else {
        bail!("inside query returned no result");
    };

    println!("Segment ({}, {}) -> ({}, {})", x1, y1, x2, y2);
    println!("Polygon with {} points", polygon.len());
    if hits.is_empty() {
        println!("  No intersections.");
    } else {
        println!("  {} intersection(s):", hits.len());
        for hit in &hits {
            println!("    ({:.4}, {:.4})", hit.point.x, hit.point.y);
        }
    }
    println!("  Inside: {}", inside);
    Ok(())
}
