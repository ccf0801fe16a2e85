//! Tests for drive resource path resolution.

use graph_drive::path::{
    children_by_id, children_path, content_path, copy_by_id, item_by_id, item_path, join,
    normalize, split_parent,
};

mod item_paths {
    use super::*;

    #[test]
    fn test_empty_path_is_root() {
        assert_eq!(item_path("d1", ""), "/drives/d1/root");
    }

    #[test]
    fn test_slashes_only_is_root() {
        assert_eq!(item_path("d1", "/"), "/drives/d1/root");
        assert_eq!(item_path("d1", "//"), "/drives/d1/root");
    }

    #[test]
    fn test_single_segment() {
        assert_eq!(item_path("d1", "a.txt"), "/drives/d1/root:/a.txt");
    }

    #[test]
    fn test_nested_segments() {
        assert_eq!(
            item_path("d1", "docs/2024/report.pdf"),
            "/drives/d1/root:/docs/2024/report.pdf"
        );
    }

    #[test]
    fn test_surrounding_slashes_are_trimmed() {
        assert_eq!(item_path("d1", "/docs/a.txt/"), "/drives/d1/root:/docs/a.txt");
    }
}

mod children_paths {
    use super::*;

    #[test]
    fn test_root_children() {
        assert_eq!(children_path("d1", ""), "/drives/d1/root/children");
    }

    #[test]
    fn test_nested_children() {
        assert_eq!(
            children_path("d1", "docs/2024"),
            "/drives/d1/root:/docs/2024:/children"
        );
    }
}

mod content_paths {
    use super::*;

    #[test]
    fn test_content_path() {
        assert_eq!(
            content_path("d1", "docs/a.txt").unwrap(),
            "/drives/d1/root:/docs/a.txt:/content"
        );
    }

    #[test]
    fn test_root_has_no_content_endpoint() {
        assert!(content_path("d1", "").is_err());
        assert!(content_path("d1", "/").is_err());
    }
}

mod id_paths {
    use super::*;

    #[test]
    fn test_item_by_id() {
        assert_eq!(item_by_id("d1", "abc"), "/drives/d1/items/abc");
    }

    #[test]
    fn test_children_by_id() {
        assert_eq!(children_by_id("d1", "abc"), "/drives/d1/items/abc/children");
    }

    #[test]
    fn test_copy_by_id() {
        assert_eq!(copy_by_id("d1", "abc"), "/drives/d1/items/abc/copy");
    }
}

mod parent_split {
    use super::*;

    #[test]
    fn test_nested_parent() {
        assert_eq!(
            split_parent("a/b/c.txt").unwrap(),
            ("a/b".to_string(), "c.txt".to_string())
        );
    }

    #[test]
    fn test_top_level_parent_is_root() {
        assert_eq!(
            split_parent("c.txt").unwrap(),
            (String::new(), "c.txt".to_string())
        );
    }

    #[test]
    fn test_empty_path_is_rejected() {
        assert!(split_parent("").is_err());
        assert!(split_parent("///").is_err());
    }

    #[test]
    fn test_split_then_join_round_trips() {
        let (parent, leaf) = split_parent("docs/2024/report.pdf").unwrap();
        assert_eq!(join(&parent, &leaf), "docs/2024/report.pdf");
    }
}

mod normalization {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("/a/b/"), "a/b");
        assert_eq!(normalize("a/b"), "a/b");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_join_at_root() {
        assert_eq!(join("", "a.txt"), "a.txt");
        assert_eq!(join("/", "a.txt"), "a.txt");
    }

    #[test]
    fn test_join_nested() {
        assert_eq!(join("docs", "a.txt"), "docs/a.txt");
    }
}
