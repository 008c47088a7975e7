use super::*;
use crate::serialize::{DeserializeSized, Serialize};
use crate::signature::{RitEpochTime, RitSignature, RitTime, RitTimeZoneOffset};
use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;
use smallvec::SmallVec;
use std::str::FromStr;

impl Arbitrary for Oid {
    fn arbitrary(g: &mut Gen) -> Self {
        let mut bytes = [0; 20];
        bytes.iter_mut().for_each(|b| *b = u8::arbitrary(g));
        Self::new(bytes)
    }
}

impl Arbitrary for FileMode {
    fn arbitrary(g: &mut Gen) -> Self {
        *g.choose(&[FileMode::REG, FileMode::TREE]).unwrap()
    }
}

impl Arbitrary for TreeEntry {
    fn arbitrary(g: &mut Gen) -> Self {
        Self {
            mode: Arbitrary::arbitrary(g),
            name: crate::test_utils::generate_sane_path_component(g),
            oid: Arbitrary::arbitrary(g),
        }
    }
}

impl Arbitrary for Tree {
    fn arbitrary(g: &mut Gen) -> Self {
        Self { entries: Arbitrary::arbitrary(g) }
    }
}

fn arbitrary_signature(g: &mut Gen) -> RitSignature {
    RitSignature {
        name: crate::test_utils::generate_sane_path_component(g),
        email: format!("{}@example.com", crate::test_utils::generate_sane_path_component(g)),
        time: RitTime {
            time: RitEpochTime::new(u32::arbitrary(g) as i64),
            offset: RitTimeZoneOffset::new((i8::arbitrary(g) as i32) * 15),
        },
    }
}

impl Arbitrary for Commit {
    fn arbitrary(g: &mut Gen) -> Self {
        let parents =
            (0..usize::arbitrary(g) % 3).map(|_| Oid::arbitrary(g)).collect::<SmallVec<_>>();
        Self {
            tree: Arbitrary::arbitrary(g),
            parents,
            author: arbitrary_signature(g),
            committer: arbitrary_signature(g),
            message: format!("{}\n", crate::test_utils::generate_sane_path_component(g)),
        }
    }
}

#[quickcheck]
fn test_serialize_then_parse_tree(tree: Tree) -> RitResult<()> {
    let bytes = tree.serialize_to_vec()?;
    let parsed = Tree::deserialize_from_slice(&bytes)?;
    assert_eq!(tree, parsed);
    Ok(())
}

#[quickcheck]
fn test_serialize_then_parse_commit(commit: Commit) -> RitResult<()> {
    let bytes = commit.serialize_to_vec()?;
    let parsed = Commit::deserialize_from_slice(&bytes)?;
    assert_eq!(commit, parsed);
    Ok(())
}

#[test]
fn test_tree_entries_are_name_ordered() -> RitResult<()> {
    let mk = |name: &str| TreeEntry {
        mode: FileMode::REG,
        name: name.to_owned(),
        oid: Oid::EMPTY_BLOB,
    };
    let mut tree = Tree::default();
    tree.entries.insert(mk("zebra"));
    tree.entries.insert(mk("apple"));
    tree.entries.insert(mk("mango"));
    let names = tree.entries.iter().map(|entry| entry.name.as_str()).collect::<Vec<_>>();
    assert_eq!(names, vec!["apple", "mango", "zebra"]);
    Ok(())
}

#[test]
fn test_parse_commit_multiple_parents() -> RitResult<()> {
    let payload = "tree 4b825dc642cb6eb9a060e54bf8d69288fbee4904\n\
                   parent e69de29bb2d1d6434b8b29ae775ad8c2e48c5391\n\
                   parent b6fc4c620b67d95f953a5c1c1230aaab5db5a1b0\n\
                   author A User <a@example.com> 0 +0000\n\
                   committer A User <a@example.com> 0 +0000\n\
                   \n\
                   merge two histories\n";
    let commit = Commit::deserialize_from_slice(payload.as_bytes())?;
    assert_eq!(commit.parents.len(), 2);
    assert_eq!(commit.tree, Oid::EMPTY_TREE);
    assert_eq!(commit.subject(), "merge two histories");
    let roundtripped = commit.serialize_to_vec()?;
    assert_eq!(roundtripped, payload.as_bytes());
    Ok(())
}

#[test]
fn test_framing_header() -> RitResult<()> {
    let blob = Blob::new(b"hello".to_vec());
    let framed = blob.serialize_with_headers()?;
    assert_eq!(&framed, b"blob 5\0hello");

    let mut reader = &framed[..];
    let header = read_obj_header(&mut reader)?;
    assert_eq!(header, RitObjHeader { obj_type: RitObjType::Blob, size: 5 });
    Ok(())
}

#[test]
fn test_filemode_display_and_parse() -> RitResult<()> {
    assert_eq!(format!("{}", FileMode::REG), "100644");
    assert_eq!(format!("{:#}", FileMode::TREE), "40000");
    assert_eq!(FileMode::from_str("100644")?, FileMode::REG);
    assert_eq!(FileMode::from_str("40000")?, FileMode::TREE);
    assert!(FileMode::from_str("120000").is_err());
    Ok(())
}
