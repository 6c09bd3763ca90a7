use crate::bounds::Extent;

/// WGS84 semi-major axis (meters), the sphere radius used by Web Mercator.
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// World width/height in Web Mercator meters.
pub const WORLD_SIZE: f64 = 2.0 * std::f64::consts::PI * EARTH_RADIUS;

/// Latitude clamp keeping the Mercator square finite.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Geographic lon/lat (degrees) to Web Mercator meters.
pub fn lon_lat_to_mercator(lon_lat: [f64; 2]) -> [f64; 2] {
    let lon = lon_lat[0].to_radians();
    let lat = lon_lat[1].clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    [
        EARTH_RADIUS * lon,
        EARTH_RADIUS * (std::f64::consts::FRAC_PI_4 + lat / 2.0).tan().ln(),
    ]
}

/// Web Mercator meters back to geographic lon/lat (degrees).
pub fn mercator_to_lon_lat(xy: [f64; 2]) -> [f64; 2] {
    let lon = (xy[0] / EARTH_RADIUS).to_degrees();
    let lat = (2.0 * (xy[1] / EARTH_RADIUS).exp().atan() - std::f64::consts::FRAC_PI_2).to_degrees();
    [lon, lat]
}

/// Project a geographic `[min_lon, min_lat, max_lon, max_lat]` box.
pub fn bbox_to_extent(bbox: [f64; 4]) -> Extent {
    let min = lon_lat_to_mercator([bbox[0], bbox[1]]);
    let max = lon_lat_to_mercator([bbox[2], bbox[3]]);
    Extent::new(min, max)
}

/// Full Web Mercator square.
pub fn world_extent() -> Extent {
    let half = WORLD_SIZE / 2.0;
    Extent::new([-half, -half], [half, half])
}

#[cfg(test)]
mod tests {
    use super::{MAX_LATITUDE, bbox_to_extent, lon_lat_to_mercator, mercator_to_lon_lat};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn origin_maps_to_origin() {
        let m = lon_lat_to_mercator([0.0, 0.0]);
        assert_close(m[0], 0.0, 1e-9);
        assert_close(m[1], 0.0, 1e-9);
    }

    #[test]
    fn round_trip_is_stable() {
        let geo = [6.632, 46.519];
        let back = mercator_to_lon_lat(lon_lat_to_mercator(geo));
        assert_close(back[0], geo[0], 1e-9);
        assert_close(back[1], geo[1], 1e-9);
    }

    #[test]
    fn latitude_is_clamped_to_mercator_square() {
        let top = lon_lat_to_mercator([0.0, 90.0]);
        let clamped = lon_lat_to_mercator([0.0, MAX_LATITUDE]);
        assert_close(top[1], clamped[1], 1e-6);
    }

    #[test]
    fn bbox_projection_preserves_corner_order() {
        let e = bbox_to_extent([5.9, 45.8, 10.5, 47.8]);
        assert!(e.min[0] < e.max[0]);
        assert!(e.min[1] < e.max[1]);
    }
}
