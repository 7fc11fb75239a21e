//! Functions for writing trajectories in CSV format.
//!
//! A row is `angle,x,y` with the angle in radians. Unresolved samples keep
//! their row with empty coordinates.
pub use csv::Error;
use crate::Trajectory;
use csv::Writer;
use serde::Serialize;

#[derive(Serialize)]
struct Row {
    angle: f64,
    x: Option<f64>,
    y: Option<f64>,
}

/// Write the trajectory to a writer.
pub fn write_csv<W>(w: W, path: &Trajectory) -> Result<(), Error>
where
    W: std::io::Write,
{
    let mut w = Writer::from_writer(w);
    path.iter()
        .map(|(angle, p)| Row { angle, x: p.map(|[x, _]| x), y: p.map(|[_, y]| y) })
        .try_for_each(|row| w.serialize(row))?;
    w.flush()?;
    Ok(())
}

/// Dump the trajectory to string.
///
/// ```
/// use jansen::{csv::dump_csv, Trajectory};
///
/// let path = Trajectory::from(vec![Some([1., 2.]), None]);
/// let s = dump_csv(&path).unwrap();
/// assert_eq!(s, "angle,x,y\n0.0,1.0,2.0\n3.141592653589793,,\n");
/// ```
pub fn dump_csv(path: &Trajectory) -> Result<String, Box<dyn std::error::Error>> {
    let mut buf = Vec::new();
    write_csv(&mut buf, path)?;
    Ok(String::from_utf8(buf)?)
}
