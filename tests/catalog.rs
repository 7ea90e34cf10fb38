use quake_globe::data::parse_catalog;
use quake_globe::{EarthSurface, MorphMode, SeverityTier, SurfaceConfig};

const CATALOG: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "properties": {
        "mag": 9.1, "time": 1299822384120, "place": "near the east coast of Honshu, Japan"
      },
      "geometry": { "type": "Point", "coordinates": [142.373, 38.297, 29.0] }
    },
    {
      "type": "Feature",
      "properties": { "mag": 7.8, "time": 1675646254342, "place": "Pazarcik earthquake, Turkey" },
      "geometry": { "type": "Point", "coordinates": [37.032, 37.174, 10.0] }
    },
    {
      "type": "Feature",
      "properties": { "mag": null, "time": 1675646254342 },
      "geometry": { "type": "Point", "coordinates": [0.0, 0.0, 10.0] }
    },
    {
      "type": "Feature",
      "properties": { "mag": 5.0, "time": 1600000000000 },
      "geometry": { "type": "Point", "coordinates": [200.0, 10.0, 10.0] }
    }
  ]
}"#;

#[test]
fn catalog_to_markers() {
    let records = parse_catalog(CATALOG).unwrap();
    // The null magnitude is skipped by the loader, the bad longitude by the surface
    assert_eq!(records.len(), 3);
    assert!(records.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));

    let json = br#"{"initial_mode": "globe", "mesh": {"rows": 8, "cols": 16}}"#;
    let config = SurfaceConfig::from_json(json.to_vec()).unwrap();
    let mut surface = EarthSurface::initialize(&config).unwrap();
    assert_eq!(surface.mode(), MorphMode::Globe);

    let report = surface.spawn_all(&records);
    assert_eq!(report.spawned, 2);
    assert_eq!(report.rejected, 1);

    let mut tiers: Vec<SeverityTier> = surface.markers().map(|(_, m)| m.tier()).collect();
    tiers.sort();
    assert_eq!(tiers, vec![SeverityTier::Moderate, SeverityTier::Severe]);

    // On the globe every marker sits on the unit sphere
    for (_, marker) in surface.markers() {
        assert!((marker.rendered_position().length() - 1.0).abs() < 1e-12);
    }
}
