use std::fmt;

use pretty_assertions::{assert_eq, assert_ne};

use svgdoc::{Element, Error, Options, Path, Svg, Transform};

#[derive(Clone, Copy, PartialEq)]
struct MStr<'a>(&'a str);

impl<'a> fmt::Debug for MStr<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[tokio::test]
async fn no_matrices_leave_shapes_in_place() {
    let svg = Svg::from_str(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <rect x='10' y='20' width='30' height='40'/>
            <circle cx='5' cy='5' r='5'/>
            <polygon points='0,0 10,0 10,10'/>
            <line x1='0' y1='0' x2='10' y2='10'/>
            <path d='M 0 0 L 10 0'/>
        </svg>",
    )
    .await
    .unwrap();

    let new_svg = svg.apply_matrix(&[]).await.unwrap();
    assert_eq!(MStr(&new_svg.to_xml(false)), MStr(&svg.to_xml(false)));
}

// The pending transform is folded into the geometry and
// does not survive into the result.
#[tokio::test]
async fn pending_transform_is_consumed() {
    let svg = Svg::from_str(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <rect x='10' y='10' width='10' height='10' transform='matrix(1 0 0 1 5 5)'/>
        </svg>",
    )
    .await
    .unwrap();

    let new_svg = svg.apply_matrix(&[]).await.unwrap();
    assert!(new_svg.elements()[0].transform().is_default());
    assert_eq!(
        MStr(&new_svg.to_xml(false)),
        MStr(r#"<svg version="1.1" xmlns="http://www.w3.org/2000/svg"><rect x="15" y="15" width="10" height="10"/></svg>"#),
    );
}

#[tokio::test]
async fn base_translate_moves_shapes() {
    let svg = Svg::from_str(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <line x1='0' y1='0' x2='10' y2='10'/>
            <polyline points='0,0 10,0'/>
            <path d='M 0 0 L 10 0'/>
        </svg>",
    )
    .await
    .unwrap();

    let new_svg = svg
        .apply_matrix(&[Transform::new_translate(5.0, 5.0)])
        .await
        .unwrap();

    assert_eq!(
        MStr(&new_svg.to_xml(false)),
        MStr(r#"<svg version="1.1" xmlns="http://www.w3.org/2000/svg"><line x1="5" y1="5" x2="15" y2="15"/><polyline points="5,5 15,5"/><path d="M 5 5 L 15 5"/></svg>"#),
    );
}

// `[a, b]` must behave like the single matrix `a * b`,
// with `b` applied to the coordinates first.
#[tokio::test]
async fn matrices_compose_left_to_right() {
    let svg = Svg::from_str(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <rect x='0' y='0' width='10' height='10'/>
        </svg>",
    )
    .await
    .unwrap();

    let translate = Transform::new_translate(10.0, 0.0);
    let scale = Transform::new_scale(2.0, 2.0);

    let mut combined = translate;
    combined.append(&scale);

    let composed = svg.apply_matrix(&[translate, scale]).await.unwrap();
    let single = svg.apply_matrix(&[combined]).await.unwrap();
    assert_eq!(MStr(&composed.to_xml(false)), MStr(&single.to_xml(false)));

    let swapped = svg.apply_matrix(&[scale, translate]).await.unwrap();
    assert_ne!(composed.to_xml(false), swapped.to_xml(false));

    assert_eq!(
        MStr(&composed.to_xml(false)),
        MStr(r#"<svg version="1.1" xmlns="http://www.w3.org/2000/svg"><rect x="10" y="0" width="20" height="20"/></svg>"#),
    );
    assert_eq!(
        MStr(&swapped.to_xml(false)),
        MStr(r#"<svg version="1.1" xmlns="http://www.w3.org/2000/svg"><rect x="20" y="0" width="20" height="20"/></svg>"#),
    );
}

// Elements are processed concurrently, but the document
// order of the result never changes.
#[tokio::test]
async fn document_order_is_preserved() {
    let svg = Svg::from_str(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <rect id='r1' x='0' y='0' width='1' height='1'/>
            <rect id='r2' x='1' y='0' width='1' height='1'/>
            <rect id='r3' x='2' y='0' width='1' height='1'/>
            <rect id='r4' x='3' y='0' width='1' height='1'/>
            <rect id='r5' x='4' y='0' width='1' height='1'/>
        </svg>",
    )
    .await
    .unwrap();

    let new_svg = svg
        .apply_matrix(&[Transform::new_translate(1.0, 1.0)])
        .await
        .unwrap();

    let ids: Vec<&str> = new_svg.elements().iter().map(|e| e.id()).collect();
    assert_eq!(ids, ["r1", "r2", "r3", "r4", "r5"]);
}

#[tokio::test]
async fn rotated_rect_becomes_polygon() {
    let svg = Svg::from_str(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <rect id='r' x='0' y='0' width='10' height='10'/>
        </svg>",
    )
    .await
    .unwrap();

    // An exact 90 degree rotation matrix.
    let rotate = Transform::new(0.0, 1.0, -1.0, 0.0, 0.0, 0.0);
    let new_svg = svg.apply_matrix(&[rotate]).await.unwrap();

    assert_eq!(
        MStr(&new_svg.to_xml(false)),
        MStr(r#"<svg version="1.1" xmlns="http://www.w3.org/2000/svg"><polygon id="r" points="0,0 0,10 -10,10 -10,0"/></svg>"#),
    );
}

// A pending transform acts around the element's own bbox center,
// so a rotated rect keeps its position.
#[tokio::test]
async fn pending_transform_is_anchored_at_bbox_center() {
    let svg = Svg::from_str(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <rect id='r' x='10' y='10' width='20' height='20' transform='matrix(0 1 -1 0 0 0)'/>
        </svg>",
    )
    .await
    .unwrap();

    let new_svg = svg.apply_matrix(&[]).await.unwrap();
    assert_eq!(
        MStr(&new_svg.to_xml(false)),
        MStr(r#"<svg version="1.1" xmlns="http://www.w3.org/2000/svg"><polygon id="r" points="30,10 30,30 10,30 10,10"/></svg>"#),
    );
}

#[tokio::test]
async fn scaled_circle_stays_circle() {
    let svg = Svg::from_str(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <circle cx='10' cy='10' r='5'/>
        </svg>",
    )
    .await
    .unwrap();

    let new_svg = svg
        .apply_matrix(&[Transform::new_scale(2.0, 2.0)])
        .await
        .unwrap();

    assert_eq!(
        MStr(&new_svg.to_xml(false)),
        MStr(r#"<svg version="1.1" xmlns="http://www.w3.org/2000/svg"><circle cx="20" cy="20" r="10"/></svg>"#),
    );
}

#[tokio::test]
async fn circle_becomes_ellipse_under_non_proportional_scale() {
    let svg = Svg::from_str(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <circle cx='10' cy='10' r='5'/>
        </svg>",
    )
    .await
    .unwrap();

    let new_svg = svg
        .apply_matrix(&[Transform::new_scale(2.0, 3.0)])
        .await
        .unwrap();

    assert_eq!(
        MStr(&new_svg.to_xml(false)),
        MStr(r#"<svg version="1.1" xmlns="http://www.w3.org/2000/svg"><ellipse cx="20" cy="30" rx="10" ry="15"/></svg>"#),
    );
}

#[tokio::test]
async fn rotated_circle_is_rejected() {
    let svg = Svg::from_str(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <circle id='c1' cx='10' cy='10' r='5'/>
        </svg>",
    )
    .await
    .unwrap();

    let rotate = Transform::new(0.0, 1.0, -1.0, 0.0, 0.0, 0.0);
    let res = svg.apply_matrix(&[rotate]).await;
    assert!(matches!(res, Err(Error::UnsupportedTransform(ref s)) if s == "circle#c1"));
}

#[tokio::test]
async fn group_children_are_transformed() {
    let svg = Svg::from_str(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <g id='g1' transform='matrix(1 0 0 1 5 5)'>
                <rect x='0' y='0' width='10' height='10'/>
            </g>
        </svg>",
    )
    .await
    .unwrap();

    let new_svg = svg
        .apply_matrix(&[Transform::new_translate(10.0, 0.0)])
        .await
        .unwrap();

    assert_eq!(
        MStr(&new_svg.to_xml(false)),
        MStr(r#"<svg version="1.1" xmlns="http://www.w3.org/2000/svg"><g id="g1"><rect x="15" y="5" width="10" height="10"/></g></svg>"#),
    );
}

// An element without a bbox aborts the whole run.
#[tokio::test]
async fn empty_group_has_no_bbox() {
    let svg = Svg::from_str(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <rect x='0' y='0' width='10' height='10'/>
            <g/>
        </svg>",
    )
    .await
    .unwrap();

    let res = svg.apply_matrix(&[]).await;
    assert!(matches!(res, Err(Error::InvalidBbox(ref s)) if s == "g"));
}

#[tokio::test]
async fn empty_group_inside_group_fails() {
    let svg = Svg::from_str(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <g id='outer'>
                <rect x='0' y='0' width='10' height='10'/>
                <g id='inner'/>
            </g>
        </svg>",
    )
    .await
    .unwrap();

    let res = svg.apply_matrix(&[]).await;
    assert!(matches!(res, Err(Error::InvalidBbox(ref s)) if s == "g#inner"));
}

#[tokio::test]
async fn empty_path_has_no_bbox() {
    let mut svg = Svg::new();
    svg.add_element(Element::Path(Path {
        id: "p1".to_string(),
        ..Path::default()
    }));

    let res = svg.apply_matrix(&[]).await;
    assert!(matches!(res, Err(Error::InvalidBbox(ref s)) if s == "path#p1"));
}

#[tokio::test]
async fn empty_document() {
    let svg = Svg::new();
    let new_svg = svg.apply_matrix(&[Transform::new_scale(2.0, 2.0)]).await.unwrap();
    assert!(new_svg.elements().is_empty());
}

#[tokio::test]
async fn save_generates_unique_paths() {
    let dir = tempfile::tempdir().unwrap();
    let svg = Svg::from_str(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <rect x='0' y='0' width='10' height='10'/>
        </svg>",
    )
    .await
    .unwrap();

    let mut opt = Options::default();
    opt.output_dir = dir.path().to_path_buf();
    opt.file_stem = "doc".to_string();
    opt.clock = || 1234;

    let first = svg.save(&opt).await.unwrap();
    let second = svg.save(&opt).await.unwrap();

    // Same clock value, still distinct files.
    assert_ne!(first, second);
    assert!(first.exists());
    assert!(second.exists());

    let name = first.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("doc-1234-"));
    assert!(name.ends_with(".svg"));

    let written = std::fs::read_to_string(&first).unwrap();
    assert_eq!(MStr(&written), MStr(&svg.to_xml(false)));
}

#[tokio::test]
async fn save_to_explicit_path() {
    let dir = tempfile::tempdir().unwrap();
    let svg = Svg::from_str(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <circle cx='5' cy='5' r='5'/>
        </svg>",
    )
    .await
    .unwrap();

    let mut opt = Options::default();
    opt.output_path = Some(dir.path().join("out.svg"));

    let path = svg.save(&opt).await.unwrap();
    assert_eq!(path, dir.path().join("out.svg"));

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(MStr(&written), MStr(&svg.to_xml(false)));
}

#[tokio::test]
async fn save_png_with_missing_converter() {
    let dir = tempfile::tempdir().unwrap();
    let svg = Svg::from_str(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <rect x='0' y='0' width='10' height='10'/>
        </svg>",
    )
    .await
    .unwrap();

    let mut opt = Options::default();
    opt.output_dir = dir.path().to_path_buf();
    opt.converter = "svgdoc-test-missing-converter".to_string();

    let res = svg.save_png(&opt).await;
    assert!(matches!(res, Err(Error::ConverterFailed(_))));
}

// Any `converter svg-file png-file` style program will do,
// so `cp` stands in for ImageMagick here.
#[cfg(unix)]
#[tokio::test]
async fn save_png_invokes_converter() {
    let dir = tempfile::tempdir().unwrap();
    let svg = Svg::from_str(
        "<svg xmlns='http://www.w3.org/2000/svg'>
            <rect x='0' y='0' width='10' height='10'/>
        </svg>",
    )
    .await
    .unwrap();

    let mut opt = Options::default();
    opt.output_dir = dir.path().to_path_buf();
    opt.output_path = Some(dir.path().join("out.png"));
    opt.converter = "cp".to_string();

    let path = svg.save_png(&opt).await.unwrap();
    assert_eq!(path, dir.path().join("out.png"));
    assert!(path.exists());
}
