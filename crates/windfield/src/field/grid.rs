use glam::DVec2;

/// Regular lat/lon lattice.
///
/// Stored canonically: `lats` strictly descending, `lons` strictly
/// ascending, `u[lat_index][lon_index]`. Construction goes through
/// [`FieldPayload`](super::FieldPayload) validation.
#[derive(Debug, Clone, PartialEq)]
pub struct GridField {
    pub(crate) lats: Vec<f64>,
    pub(crate) lons: Vec<f64>,
    pub(crate) u: Vec<Vec<f64>>,
    pub(crate) v: Vec<Vec<f64>>,
}

impl GridField {
    pub fn lats(&self) -> &[f64] {
        &self.lats
    }

    pub fn lons(&self) -> &[f64] {
        &self.lons
    }

    pub fn node_count(&self) -> usize {
        self.lats.len() * self.lons.len()
    }

    /// Node position for a row-major node index
    pub fn node_position(&self, index: usize) -> Option<(f64, f64)> {
        let cols = self.lons.len();
        if cols == 0 || index >= self.node_count() {
            return None;
        }
        Some((self.lats[index / cols], self.lons[index % cols]))
    }

    pub fn node_vector(&self, i: usize, j: usize) -> Option<DVec2> {
        Some(DVec2::new(*self.u.get(i)?.get(j)?, *self.v.get(i)?.get(j)?))
    }

    /// Bilinear interpolation of (u, v) at a position.
    ///
    /// Returns `None` outside `[lats[last], lats[0]] x [lons[0], lons[last]]`.
    pub fn sample(&self, lat: f64, lon: f64) -> Option<DVec2> {
        let (i, a) = self.lat_cell(lat)?;
        let (j, b) = self.lon_cell(lon)?;

        let u00 = self.u[i][j];
        let u10 = self.u[i + 1][j];
        let u01 = self.u[i][j + 1];
        let u11 = self.u[i + 1][j + 1];
        let v00 = self.v[i][j];
        let v10 = self.v[i + 1][j];
        let v01 = self.v[i][j + 1];
        let v11 = self.v[i + 1][j + 1];

        let w00 = (1.0 - a) * (1.0 - b);
        let w10 = a * (1.0 - b);
        let w01 = (1.0 - a) * b;
        let w11 = a * b;

        Some(DVec2::new(
            u00 * w00 + u10 * w10 + u01 * w01 + u11 * w11,
            v00 * w00 + v10 * w10 + v01 * w01 + v11 * w11,
        ))
    }

    /// Cell `i` with `lats[i] >= lat > lats[i + 1]` and the weight toward `i + 1`
    fn lat_cell(&self, lat: f64) -> Option<(usize, f64)> {
        let last = self.lats.len().checked_sub(1)?;
        if last == 0 || !(lat <= self.lats[0] && lat >= self.lats[last]) {
            return None;
        }
        // number of nodes at or north of `lat`, at least 1 given the range check
        let mut i = self.lats.partition_point(|&node| node >= lat) - 1;
        if i == last {
            // exactly on the southern edge: last cell, full weight
            i = last - 1;
        }
        let (lat0, lat1) = (self.lats[i], self.lats[i + 1]);
        Some((i, (lat - lat0) / (lat1 - lat0)))
    }

    /// Cell `j` with `lons[j] <= lon < lons[j + 1]` and the weight toward `j + 1`
    fn lon_cell(&self, lon: f64) -> Option<(usize, f64)> {
        let last = self.lons.len().checked_sub(1)?;
        if last == 0 || !(lon >= self.lons[0] && lon <= self.lons[last]) {
            return None;
        }
        let mut j = self.lons.partition_point(|&node| node <= lon) - 1;
        if j == last {
            j = last - 1;
        }
        let (lon0, lon1) = (self.lons[j], self.lons[j + 1]);
        Some((j, (lon - lon0) / (lon1 - lon0)))
    }
}
