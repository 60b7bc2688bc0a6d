use super::*;
use pretty_assertions::assert_eq;
use std::fs::File;
use tempfile::tempdir;

fn touch(dir: &Path, names: &[&str]) {
    for name in names {
        File::create(dir.join(name)).unwrap();
    }
}

#[test]
fn test_discover_natural_order() {
    let dir = tempdir().unwrap();
    touch(dir.path(), &["case10.py", "case1.py", "case2.py"]);

    let names = discover(dir.path(), ".py").unwrap();
    assert_eq!(names, vec!["case1", "case2", "case10"]);
}

#[test]
fn test_discover_filters_by_suffix() {
    let dir = tempdir().unwrap();
    touch(
        dir.path(),
        &[
            "a.py",
            "a.py.ast",
            "a.py.out.typed",
            "b.py",
            "notes.txt",
            ".py",
        ],
    );
    fs::create_dir(dir.path().join("nested.py")).unwrap();

    assert_eq!(discover(dir.path(), ".py").unwrap(), vec!["a", "b"]);
    assert_eq!(discover(dir.path(), ".py.ast").unwrap(), vec!["a"]);
}

#[test]
fn test_discover_does_not_recurse() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();
    touch(&sub, &["deep.py"]);
    touch(dir.path(), &["top.py"]);

    assert_eq!(discover(dir.path(), ".py").unwrap(), vec!["top"]);
}

#[test]
fn test_discover_missing_directory() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope");
    assert!(matches!(
        discover(&missing, ".py"),
        Err(DiscoveryError::NotADirectory { .. })
    ));
}

#[test]
fn test_discover_empty_directory() {
    let dir = tempdir().unwrap();
    assert!(discover(dir.path(), ".py").unwrap().is_empty());
}

#[test]
fn test_discover_cases_paths() {
    let dir = tempdir().unwrap();
    touch(dir.path(), &["op_add.py"]);

    let cases = discover_cases(dir.path(), Stage::Semantic).unwrap();
    assert_eq!(cases.len(), 1);
    let case = &cases[0];
    assert_eq!(case.name(), "op_add");
    assert_eq!(case.stage(), Stage::Semantic);
    assert_eq!(case.source_path(), dir.path().join("op_add.py"));
    assert_eq!(case.reference_path(), dir.path().join("op_add.py.out.typed"));
}

#[test]
fn test_natural_cmp() {
    assert_eq!(natural_cmp("case2", "case10"), Ordering::Less);
    assert_eq!(natural_cmp("case10", "case2"), Ordering::Greater);
    assert_eq!(natural_cmp("a", "a1"), Ordering::Less);
    assert_eq!(natural_cmp("bad_expr", "bad_stmt"), Ordering::Less);
    assert_eq!(natural_cmp("x9y", "x10a"), Ordering::Less);
    assert_eq!(natural_cmp("1", "a"), Ordering::Less);
    assert_eq!(natural_cmp("same", "same"), Ordering::Equal);
    // Equal numeric value, leading zeros differ: byte order decides.
    assert_eq!(natural_cmp("t01", "t1"), Ordering::Less);
}

#[test]
fn test_natural_cmp_large_numbers() {
    assert_eq!(
        natural_cmp("t99999999999999999999999", "t100000000000000000000000"),
        Ordering::Less
    );
}

mod proptest_natural {
    use super::super::natural_cmp;
    use proptest::prelude::*;
    use std::cmp::Ordering;

    proptest! {
        #[test]
        fn numeric_suffix_orders_by_value(prefix in "[a-z_]{0,6}", x in 0u32..100_000, y in 0u32..100_000) {
            let left = format!("{prefix}{x}");
            let right = format!("{prefix}{y}");
            prop_assert_eq!(natural_cmp(&left, &right), x.cmp(&y));
        }

        #[test]
        fn antisymmetric(a in "[a-c0-9]{0,8}", b in "[a-c0-9]{0,8}") {
            prop_assert_eq!(natural_cmp(&a, &b), natural_cmp(&b, &a).reverse());
        }

        #[test]
        fn equal_only_when_identical(a in "[a-c0-9]{0,8}", b in "[a-c0-9]{0,8}") {
            prop_assert_eq!(natural_cmp(&a, &b) == Ordering::Equal, a == b);
        }
    }
}
