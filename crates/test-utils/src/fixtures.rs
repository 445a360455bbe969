//! Common test fixtures for contour and projection tests.
//!
//! This module provides pre-defined inputs that represent common
//! scenarios in gridded data contouring.

/// Small hand-checkable grids (row-major, `[row][col]`).
pub mod grids {
    /// 3x3 grid with a single high centre point.
    /// At level 5 the contour is a diamond through (0.5,1), (1,0.5), (1.5,1), (1,1.5).
    pub const DIAMOND: [[f64; 3]; 3] = [[0.0, 0.0, 0.0], [0.0, 10.0, 0.0], [0.0, 0.0, 0.0]];

    /// 3x3 grid with a single low centre point.
    pub const PIT: [[f64; 3]; 3] = [[10.0, 10.0, 10.0], [10.0, 0.0, 10.0], [10.0, 10.0, 10.0]];

    /// One ambiguous cell with high corners on the main diagonal.
    /// Corner mean is 5, so a level of 5 resolves as high-centre.
    pub const SADDLE: [[f64; 2]; 2] = [[10.0, 0.0], [0.0, 10.0]];

    /// Flatten a fixed grid into row-major data.
    pub fn flatten<const R: usize, const C: usize>(grid: &[[f64; C]; R]) -> Vec<f64> {
        grid.iter().flat_map(|row| row.iter().copied()).collect()
    }
}

/// PROJ definitions of commonly gridded weather projections.
pub mod proj {
    /// HRRR Lambert conformal grid
    pub const HRRR_LCC: &str =
        "+proj=lcc +lat_0=38.5 +lon_0=-97.5 +lat_1=38.5 +lat_2=38.5 +R=6371229 +no_defs";

    /// GOES-East full disk
    pub const GOES_EAST: &str = "+proj=geos +lon_0=-75 +h=35786023 +ellps=GRS80 +sweep=x";

    /// NCEP polar stereographic (true at 60N)
    pub const NCEP_POLAR: &str = "+proj=stere +lat_0=90 +lon_0=-105 +lat_ts=60 +R=6371229";

    /// UTM zone 18 north
    pub const UTM_18N: &str = "+proj=utm +zone=18 +ellps=WGS84 +units=m +no_defs";
}
