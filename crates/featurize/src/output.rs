//! Table Output

use anyhow::Result;
use feature_builder::Table;
use std::io::Write;

/// Header record of column names, then one record per row
pub fn write_csv(table: &Table, out: &mut impl Write) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(ToString::to_string))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_json(table: &Table, out: &mut impl Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, table)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut table = Table::with_columns(["a_0", "b,x"]).unwrap();
        table.append_row(vec![1.0, 0.5]).unwrap();
        table.append_row(vec![2.0, 0.0]).unwrap();
        table
    }

    #[test]
    fn test_csv() {
        let mut out = Vec::new();
        write_csv(&sample(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a_0,\"b,x\"\n1,0.5\n2,0\n");
    }

    #[test]
    fn test_csv_quotes_special_columns() {
        let mut table = Table::with_columns(["a\rb", "q\"x", "l\nm", "plain"]).unwrap();
        table.append_row(vec![f64::NAN, 1.0, -2.5, 0.0]).unwrap();
        let mut out = Vec::new();
        write_csv(&table, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\"a\rb\",\"q\"\"x\",\"l\nm\",plain\nNaN,1,-2.5,0\n"
        );
    }

    #[test]
    fn test_json() {
        let mut out = Vec::new();
        write_json(&sample(), &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["columns"][0], "a_0");
        assert_eq!(value["data"][1][0], 2.0);
    }
}
