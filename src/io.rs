// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use std::io::Write;
use std::path::Path;

use ndarray::Array2;

use crate::core::{has_cost, CostMap, Grid, Point};
use crate::error::{FrontError, Result};

/// Width of a printed grid cell.
const CELL_WIDTH: usize = 6;

/// Lay a cost map out as a dense array over `grid`.
///
/// Row `i` holds the cells at ordinate `max.y - i * step` and column `j` the
/// cells at abscissa `min.x + j * step`, so the array reads like the plane
/// seen from above. Cells without a cost hold `+inf`.
///
/// # Errors
/// Returns an error if the grid is too large to lay out.
pub fn rasterize(costs: &CostMap, grid: &Grid) -> Result<Array2<f64>> {
    let columns = grid.columns()?;
    let rows = grid.rows()?;
    Ok(Array2::from_shape_fn((rows.len(), columns.len()), |(i, j)| {
        let p = Point::new(columns[j], rows[i]);
        match costs.get(&p) {
            Some(&c) if c.is_finite() => c,
            _ => f64::INFINITY,
        }
    }))
}

/// Print a cost map as a text grid.
///
/// The first line lists the column abscissae; each following line starts with
/// the row ordinate, from the top of the grid down. Costed cells show two
/// decimals and open cells a `.`.
///
/// # Errors
/// Returns an error if the grid is too large to lay out or on write failure.
/// Nothing is written in the former case.
pub fn write_grid<W: Write>(out: &mut W, costs: &CostMap, grid: &Grid) -> Result<()> {
    let columns = grid.columns()?;
    let rows = grid.rows()?;

    write!(out, "{:>w$}:", "x", w = CELL_WIDTH)?;
    for x in &columns {
        write!(out, " {:>w$}", x, w = CELL_WIDTH)?;
    }
    writeln!(out)?;
    writeln!(out, "{:>w$}", "y", w = CELL_WIDTH)?;

    for y in rows {
        write!(out, "{:>w$}:", y, w = CELL_WIDTH)?;
        for &x in &columns {
            let p = Point::new(x, y);
            if has_cost(&p, costs) {
                write!(out, " {:>w$.2}", costs[&p], w = CELL_WIDTH)?;
            } else {
                write!(out, " {:>w$}", ".", w = CELL_WIDTH)?;
            }
        }
        writeln!(out)?;
    }
    writeln!(out)?;
    Ok(())
}

/// Render a cost map as a text grid (see [`write_grid`]).
///
/// # Errors
/// Returns an error if the grid is too large to lay out.
pub fn format_grid(costs: &CostMap, grid: &Grid) -> Result<String> {
    let mut buf = Vec::new();
    write_grid(&mut buf, costs, grid)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Save a rasterized cost map to a .npy file.
pub fn save_npy(costs: &CostMap, grid: &Grid, path: &Path) -> Result<()> {
    let arr = rasterize(costs, grid)?;
    ndarray_npy::write_npy(path, &arr)
        .map_err(|e| FrontError::Other(format!("npy write error: {}", e)))?;
    Ok(())
}

/// Save a rasterized cost map to a .mat file (Level 5 format).
///
/// The array keeps the [`rasterize`] shape (rows from the top of the grid
/// down) and is written in column-major order, as MATLAB expects.
pub fn save_mat(costs: &CostMap, grid: &Grid, path: &Path, var_name: &str) -> Result<()> {
    let arr = rasterize(costs, grid)?;
    let (rows, cols) = arr.dim();
    let col_major: Vec<f64> = arr.t().iter().copied().collect();
    write_mat_level5(path, var_name, &[rows, cols], &col_major)
}

/// Minimal MAT-file Level 5 writer for a single real f64 array.
///
/// Layout: a 128-byte header, then one uncompressed miMATRIX element made of
/// the array flags, dimensions, name and real-part sub-elements, each padded
/// to 8 bytes.
fn write_mat_level5(path: &Path, var_name: &str, dimensions: &[usize], data: &[f64]) -> Result<()> {
    let file = std::fs::File::create(path)?;
    let mut w = std::io::BufWriter::new(file);

    // Header: 116 bytes of text, 8 bytes of subsystem offset, version, endian tag.
    let mut header = [b' '; 128];
    let text = b"MATLAB 5.0 MAT-file, created by eikonal-front";
    header[..text.len()].copy_from_slice(text);
    header[116..124].fill(0);
    header[124..126].copy_from_slice(&0x0100u16.to_le_bytes());
    header[126..128].copy_from_slice(b"IM");
    w.write_all(&header)?;

    let dims_size = (dimensions.len() * 4) as u32;
    let dims_padded = dims_size.div_ceil(8) * 8;
    let name_bytes = var_name.as_bytes();
    let name_size = name_bytes.len() as u32;
    let name_padded = name_size.div_ceil(8) * 8;
    let real_size = (data.len() * 8) as u32;

    let matrix_size = 16 + (8 + dims_padded) + (8 + name_padded) + (8 + real_size);

    // miMATRIX
    w.write_all(&14u32.to_le_bytes())?;
    w.write_all(&matrix_size.to_le_bytes())?;

    // Array flags: miUINT32, mxDOUBLE_CLASS, no flags.
    w.write_all(&6u32.to_le_bytes())?;
    w.write_all(&8u32.to_le_bytes())?;
    w.write_all(&6u32.to_le_bytes())?;
    w.write_all(&0u32.to_le_bytes())?;

    // Dimensions: miINT32.
    w.write_all(&5u32.to_le_bytes())?;
    w.write_all(&dims_size.to_le_bytes())?;
    for &d in dimensions {
        w.write_all(&(d as i32).to_le_bytes())?;
    }
    w.write_all(&vec![0u8; (dims_padded - dims_size) as usize])?;

    // Name: miINT8.
    w.write_all(&1u32.to_le_bytes())?;
    w.write_all(&name_size.to_le_bytes())?;
    w.write_all(name_bytes)?;
    w.write_all(&vec![0u8; (name_padded - name_size) as usize])?;

    // Real part: miDOUBLE, already 8-byte aligned.
    w.write_all(&9u32.to_le_bytes())?;
    w.write_all(&real_size.to_le_bytes())?;
    for &val in data {
        w.write_all(&val.to_le_bytes())?;
    }

    w.flush()?;
    Ok(())
}

/// Supported file formats for cost map export.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FileFormat {
    /// NumPy .npy format.
    Npy,
    /// MATLAB .mat format (Level 5).
    Mat,
}

impl FileFormat {
    /// File extension of this format, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            FileFormat::Npy => "npy",
            FileFormat::Mat => "mat",
        }
    }
}

/// Infer file format from extension.
pub fn infer_format(path: &Path) -> Result<FileFormat> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("npy") => Ok(FileFormat::Npy),
        Some("mat") => Ok(FileFormat::Mat),
        Some(ext) => Err(FrontError::UnsupportedFileFormat(ext.to_string())),
        None => Err(FrontError::UnsupportedFileFormat(
            "(no extension)".to_string(),
        )),
    }
}

/// Save a cost map to a file, inferring format from extension.
pub fn save_grid(costs: &CostMap, grid: &Grid, path: &Path) -> Result<()> {
    match infer_format(path)? {
        FileFormat::Npy => save_npy(costs, grid, path),
        FileFormat::Mat => save_mat(costs, grid, path, "costs"),
    }
}
