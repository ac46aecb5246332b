//! Flat-file persistence for series
//!
//! A series is stored as two independent files, `<stem>.x` and `<stem>.y`,
//! each holding one column as a JSON array of numbers. Non-finite values are stored as
//! strings (see the column encoding of [`Series`]'s serde implementation).
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use super::{
    column::{Column, ColumnRef},
    Series,
};
use crate::error::Result;

fn column_path(stem: &Path, column: &str) -> PathBuf {
    let mut path = stem.as_os_str().to_owned();
    path.push(".");
    path.push(column);
    PathBuf::from(path)
}

impl Series {
    /// Writes the x and y columns to `<stem>.x` and `<stem>.y`.
    ///
    /// # Errors
    /// Returns an error if either file cannot be written.
    pub fn save(&self, stem: impl AsRef<Path>) -> Result<()> {
        let stem = stem.as_ref();
        for (column, values) in [("x", &self.x), ("y", &self.y)] {
            let mut writer = BufWriter::new(File::create(column_path(stem, column))?);
            serde_json::to_writer(&mut writer, &ColumnRef(values.as_slice()))?;
            writer.flush()?;
        }
        Ok(())
    }

    /// Reconstructs a series from the files written by [`Series::save`].
    ///
    /// # Errors
    /// Returns an error if either file cannot be read or decoded, or if the
    /// columns do not form a valid series.
    pub fn load(stem: impl AsRef<Path>) -> Result<Self> {
        let stem = stem.as_ref();
        let Column(x) = serde_json::from_slice(&std::fs::read(column_path(stem, "x"))?)?;
        let Column(y) = serde_json::from_slice(&std::fs::read(column_path(stem, "y"))?)?;
        Self::from_arrays(x, y)
    }

    /// Writes one `"<x> <y>"` line per sample to `dir/name`, for external plotting tools.
    ///
    /// x values are truncated to integers (timestamps).
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    #[allow(clippy::cast_possible_truncation)]
    pub fn save_plot(&self, dir: impl AsRef<Path>, name: &str) -> Result<()> {
        let mut writer = BufWriter::new(File::create(dir.as_ref().join(name))?);
        for (x, y) in self.iter() {
            writeln!(writer, "{} {y}", x as i64)?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("seriesfit-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_save_and_load() {
        let dir = scratch_dir("persist");
        let stem = dir.join("prices");
        let series = Series::from_fn(100.0..=110.0, 2.0, |x| x * 0.5 - 3.0);

        series.save(&stem).unwrap();
        assert!(dir.join("prices.x").exists());
        assert!(dir.join("prices.y").exists());

        let loaded = Series::load(&stem).unwrap();
        assert_eq!(loaded, series);

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_save_and_load_non_finite() {
        let dir = scratch_dir("non-finite");
        let stem = dir.join("gaps");
        let series =
            Series::from_arrays(vec![1.0, 2.0, 3.0], vec![1.0, f64::NAN, f64::NEG_INFINITY])
                .unwrap();

        series.save(&stem).unwrap();
        let loaded = Series::load(&stem).unwrap();
        assert_eq!(loaded.x(), series.x());
        assert_eq!(loaded.y()[0], 1.0);
        assert!(loaded.y()[1].is_nan());
        assert_eq!(loaded.y()[2], f64::NEG_INFINITY);

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_load_missing() {
        let dir = scratch_dir("missing");
        let result = Series::load(dir.join("nothing"));
        assert!(matches!(result, Err(Error::Io(_))));
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_load_corrupt() {
        let dir = scratch_dir("corrupt");
        std::fs::write(dir.join("bad.x"), "[1.0, 2.0]").unwrap();
        std::fs::write(dir.join("bad.y"), "not json").unwrap();
        let result = Series::load(dir.join("bad"));
        assert!(matches!(result, Err(Error::Serialization(_))));
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_save_plot() {
        let dir = scratch_dir("plot");
        let series = Series::from_arrays(vec![1.9, 3.0], vec![0.5, -2.0]).unwrap();
        series.save_plot(&dir, "plot.txt").unwrap();

        let contents = std::fs::read_to_string(dir.join("plot.txt")).unwrap();
        assert_eq!(contents, "1 0.5\n3 -2\n");
        std::fs::remove_dir_all(dir).ok();
    }
}
