// src/output.rs
use crate::error::PricingResult;
use crate::grid::matrix::OptionMatrix;
use crate::pnl::PnlProfile;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Written in place of a missing cell so it never reads as zero
pub const NOT_AVAILABLE_LABEL: &str = "NA";

fn cell(value: f64) -> String {
    if value.is_nan() {
        NOT_AVAILABLE_LABEL.to_string()
    } else {
        value.to_string()
    }
}

/// One row per strike, one column per expiration (years)
pub fn write_matrix<W: Write>(out: &mut W, matrix: &OptionMatrix) -> PricingResult<()> {
    write!(out, "strike")?;
    for e in matrix.expirations() {
        write!(out, ",{}", e)?;
    }
    writeln!(out)?;
    for (strike, row) in matrix.strikes().iter().zip(matrix.values().rows()) {
        write!(out, "{}", strike)?;
        for &v in row {
            write!(out, ",{}", cell(v))?;
        }
        writeln!(out)?;
    }
    Ok(())
}

pub fn write_pnl<W: Write>(out: &mut W, profile: &PnlProfile) -> PricingResult<()> {
    writeln!(out, "# strike,{}", profile.strike)?;
    writeln!(out, "# call_break_even,{}", profile.call_break_even)?;
    writeln!(out, "# put_break_even,{}", profile.put_break_even)?;
    writeln!(out, "price,call_pnl,put_pnl")?;
    for ((p, c), q) in profile
        .prices
        .iter()
        .zip(&profile.call_pnl)
        .zip(&profile.put_pnl)
    {
        writeln!(out, "{},{},{}", p, c, q)?;
    }
    Ok(())
}

pub fn write_matrix_to_csv<P: AsRef<Path>>(filename: P, matrix: &OptionMatrix) -> PricingResult<()> {
    let mut file = BufWriter::new(File::create(filename)?);
    write_matrix(&mut file, matrix)?;
    file.flush()?;
    Ok(())
}

pub fn write_pnl_to_csv<P: AsRef<Path>>(filename: P, profile: &PnlProfile) -> PricingResult<()> {
    let mut file = BufWriter::new(File::create(filename)?);
    write_pnl(&mut file, profile)?;
    file.flush()?;
    Ok(())
}

pub fn write_summary_to_csv<P: AsRef<Path>>(filename: P, summary_data: &[(&str, String)]) -> PricingResult<()> {
    let mut file = File::create(filename)?;
    for (key, value) in summary_data {
        writeln!(file, "{},{}", key, value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pnl::compute_pnl;
    use ndarray::array;

    #[test]
    fn test_matrix_csv_marks_missing() {
        let m = OptionMatrix::new(array![[1.5, f64::NAN], [0.0, 2.0]], vec![90.0, 100.0], vec![0.5, 1.0]).unwrap();
        let mut buf = Vec::new();
        write_matrix(&mut buf, &m).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["strike,0.5,1", "90,1.5,NA", "100,0,2"]);
    }

    #[test]
    fn test_pnl_csv_row_count() {
        let profile = compute_pnl(100.0, 4.0, 3.0).unwrap();
        let mut buf = Vec::new();
        write_pnl(&mut buf, &profile).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let data_rows = text.lines().filter(|l| !l.starts_with('#')).count() - 1;
        assert_eq!(data_rows, profile.prices.len());
        assert!(text.contains("# call_break_even,104"));
    }
}
