//! End-to-end scans through the public API

use colored_regions::{Configuration, NamedColors, RegionMap, RegionScanner};
use pretty_assertions::assert_eq;

fn spans(map: &RegionMap, color: &str) -> Vec<(usize, usize)> {
    map.get(color)
        .map(|group| {
            group
                .spans()
                .iter()
                .map(|span| (span.start_line, span.end_line))
                .collect()
        })
        .unwrap_or_default()
}

#[test]
fn nested_regions_split_parent() {
    let scanner = RegionScanner::default();
    let map = scanner.scan_lines([
        "#region [#ddd]",
        "#region [#aaa]",
        "Test",
        "#endregion",
        "#endregion",
    ]);
    assert_eq!(spans(&map, "#ddd"), vec![(0, 0), (4, 4)]);
    assert_eq!(spans(&map, "#aaa"), vec![(1, 3)]);
    assert_eq!(map.len(), 2);
}

#[test]
fn eight_digit_hex_is_kept() {
    let map = RegionScanner::default().scan_lines(["//#region[ #f9aede55 ] note", "//#endregion"]);
    assert_eq!(spans(&map, "#f9aede55"), vec![(0, 1)]);
}

#[test]
fn hex_with_internal_whitespace() {
    let map = RegionScanner::default().scan_lines(["//#region[ # f9 ae de ] note", "//#endregion"]);
    let colors: Vec<&str> = map.colors().map(|c| c.as_str()).collect();
    assert_eq!(colors, vec!["#f9aede"]);
    assert_eq!(spans(&map, "#f9aede"), vec![(0, 1)]);
}

#[test]
fn palette_index_follows_unresolved_markers() {
    let palette = vec!["#100".to_string(), "#200".to_string(), "#300".to_string()];
    let scanner = RegionScanner::new(Configuration::new(NamedColors::new(), palette));

    let mut lines = Vec::new();
    for _ in 0..7 {
        lines.push("% region");
        lines.push("% endregion");
    }
    let map = scanner.scan_lines(&lines);

    // k-th unresolved marker gets palette[k mod 3]
    assert_eq!(spans(&map, "#100"), vec![(0, 1), (6, 7), (12, 13)]);
    assert_eq!(spans(&map, "#200"), vec![(2, 3), (8, 9)]);
    assert_eq!(spans(&map, "#300"), vec![(4, 5), (10, 11)]);
}

#[test]
fn named_colors_are_loose() {
    let named: NamedColors = vec![("My Color", "#abcdef")].into_iter().collect();
    let scanner = RegionScanner::new(Configuration::new(named, Vec::new()));

    for token in ["mycolor", "MY COLOR", " My  Color "] {
        let text = format!("// region [{}]\nbody\n// endregion", token);
        let map = scanner.scan(&text);
        assert_eq!(spans(&map, "#abcdef"), vec![(0, 2)], "token {:?}", token);
    }
}

#[test]
fn mixed_dialects_in_one_document() {
    let scanner = RegionScanner::default();
    let text = [
        "<!-- #region [#111] -->",
        "<p>html</p>",
        "<!-- #endregion -->",
        "-- region [rgba(0, 128, 0, 0.3)]",
        "select 1;",
        "-- endregion",
        "#pragma region [#333]",
        "int x;",
        "#pragma endregion",
    ]
    .join("\n");
    let map = scanner.scan(&text);
    assert_eq!(spans(&map, "#111"), vec![(0, 2)]);
    assert_eq!(spans(&map, "rgba(0,128,0,0.3)"), vec![(3, 5)]);
    assert_eq!(spans(&map, "#333"), vec![(6, 8)]);
}

#[test]
fn scanning_is_deterministic() {
    let palette = vec!["#123".to_string()];
    let scanner = RegionScanner::new(Configuration::new(NamedColors::new(), palette));
    let text = "#region\n#region [x]\nbody\n#endregion\n#endregion\n#region";
    let first = scanner.scan(text);
    let second = scanner.scan(text);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn stray_end_markers_are_ignored() {
    let map = RegionScanner::default().scan("#endregion\n#endregion\n#region [#fff]\nx\n#endregion\n#endregion");
    assert_eq!(spans(&map, "#fff"), vec![(2, 4)]);
    assert_eq!(map.span_count(), 1);
}
