use super::*;
use crate::scene::model::{
    ClipPath, Fill, Group, LinearGradient, Mask, PathCommand, RadialGradient, Stop,
};

fn square(paint: Paint) -> Node {
    Node::Path(Path {
        commands: vec![
            PathCommand::Line,
            PathCommand::Line,
            PathCommand::Line,
            PathCommand::Close,
        ],
        diffs: vec![0, 0, 4, 0, 0, 4, -4, 0],
        fill: Some(Fill {
            paint,
            opacity: 255,
        }),
        ..Path::default()
    })
}

fn group(children: Vec<Node>) -> Group {
    Group {
        children,
        ..Group::default()
    }
}

#[test]
fn well_formed_tree_passes() {
    let tree = Tree {
        width: Some(4.0),
        height: Some(4.0),
        children: vec![Node::Group(Group {
            clip_path_idx: Some(0),
            mask_idx: Some(0),
            ..group(vec![square(Paint::LinearGradient(0))])
        })],
        linear_gradients: vec![LinearGradient {
            transform: None,
            x1: 0.0,
            y1: 0.0,
            x2: 4.0,
            y2: 0.0,
            stops: Vec::new(),
        }],
        clip_paths: vec![ClipPath {
            children: vec![square(Paint::RgbColor(0))],
            ..ClipPath::default()
        }],
        masks: vec![Mask {
            width: Some(4.0),
            children: vec![square(Paint::RgbColor(0xffffff))],
            ..Mask::default()
        }],
        ..Tree::default()
    };
    tree.validate().unwrap();
}

#[test]
fn empty_tree_passes() {
    Tree::default().validate().unwrap();
}

#[test]
fn dangling_gradient_index_is_rejected() {
    let tree = Tree {
        children: vec![square(Paint::RadialGradient(2))],
        ..Tree::default()
    };
    let err = tree.validate().unwrap_err();
    assert!(matches!(err, IconError::Validation(_)));
    assert!(err.to_string().contains("radial gradient index 2"));
}

#[test]
fn dangling_group_clip_and_mask_are_rejected() {
    let tree = Tree {
        children: vec![Node::Group(Group {
            clip_path_idx: Some(0),
            ..Group::default()
        })],
        ..Tree::default()
    };
    assert!(tree.validate().is_err());

    let tree = Tree {
        children: vec![Node::Group(Group {
            mask_idx: Some(1),
            ..Group::default()
        })],
        masks: vec![Mask::default()],
        ..Tree::default()
    };
    assert!(tree.validate().is_err());
}

#[test]
fn short_diff_stream_is_rejected() {
    let tree = Tree {
        children: vec![Node::Path(Path {
            commands: vec![PathCommand::Cubic],
            diffs: vec![0, 0, 1, 1, 2, 2],
            ..Path::default()
        })],
        ..Tree::default()
    };
    let err = tree.validate().unwrap_err();
    assert!(err.to_string().contains("needs 8 diffs"));
}

#[test]
fn cyclic_clip_chain_is_rejected() {
    let tree = Tree {
        clip_paths: vec![
            ClipPath {
                clip_path_idx: Some(1),
                ..ClipPath::default()
            },
            ClipPath {
                clip_path_idx: Some(0),
                ..ClipPath::default()
            },
        ],
        ..Tree::default()
    };
    let err = tree.validate().unwrap_err();
    assert!(err.to_string().contains("cyclic"));
}

#[test]
fn self_referencing_clip_is_rejected() {
    let tree = Tree {
        clip_paths: vec![ClipPath {
            clip_path_idx: Some(0),
            ..ClipPath::default()
        }],
        ..Tree::default()
    };
    assert!(tree.validate().is_err());
}

#[test]
fn mask_referenced_from_its_own_content_is_rejected() {
    let tree = Tree {
        masks: vec![Mask {
            children: vec![Node::Group(Group {
                mask_idx: Some(0),
                ..Group::default()
            })],
            ..Mask::default()
        }],
        ..Tree::default()
    };
    let err = tree.validate().unwrap_err();
    assert!(err.to_string().contains("mask 0 depends on itself"));
}

#[test]
fn shared_mask_dependencies_are_not_cycles() {
    let tree = Tree {
        masks: vec![
            Mask::default(),
            Mask {
                mask_idx: Some(0),
                ..Mask::default()
            },
            Mask {
                mask_idx: Some(0),
                children: vec![Node::Group(Group {
                    mask_idx: Some(1),
                    ..Group::default()
                })],
                ..Mask::default()
            },
        ],
        ..Tree::default()
    };
    tree.validate().unwrap();
}

#[test]
fn non_finite_numbers_are_rejected() {
    let tree = Tree {
        width: Some(f64::NAN),
        ..Tree::default()
    };
    assert!(tree.validate().is_err());

    let tree = Tree {
        children: vec![Node::Group(Group {
            transform: Some(Transform {
                tx: f64::INFINITY,
                ..Transform::IDENTITY
            }),
            ..Group::default()
        })],
        ..Tree::default()
    };
    assert!(tree.validate().is_err());
}

#[test]
fn required_diffs_counts_start_point() {
    let path = Path {
        commands: vec![PathCommand::Move, PathCommand::Quad, PathCommand::Close],
        ..Path::default()
    };
    assert_eq!(required_diffs(&path), 8);
    assert_eq!(required_diffs(&Path::default()), 0);
}

#[test]
fn stop_offsets_outside_unit_range_are_rejected() {
    let stop = |offset| Stop {
        offset,
        rgb_color: 0,
        opacity: 255,
    };
    for offset in [-0.25, 1.5] {
        let tree = Tree {
            radial_gradients: vec![RadialGradient {
                transform: None,
                fx: 0.0,
                fy: 0.0,
                cx: 0.0,
                cy: 0.0,
                r: 1.0,
                stops: vec![stop(0.0), stop(offset)],
            }],
            ..Tree::default()
        };
        let err = tree.validate().unwrap_err();
        assert!(matches!(err, IconError::Validation(_)));
        assert!(
            err.to_string().contains("radial_gradients[0].stops[1]"),
            "{err}"
        );
    }

    let edges = Tree {
        linear_gradients: vec![LinearGradient {
            transform: None,
            x1: 0.0,
            y1: 0.0,
            x2: 1.0,
            y2: 0.0,
            stops: vec![stop(0.0), stop(1.0)],
        }],
        ..Tree::default()
    };
    edges.validate().unwrap();
}
