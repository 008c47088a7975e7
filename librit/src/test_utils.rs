macro_rules! touch {
    ($repo:ident: $path:expr => $content:expr) => {{
        let abs = $repo.to_fs_path($path);
        abs.parent().map(std::fs::create_dir_all).transpose()?;
        std::fs::write(abs, $content)?;
    }};
}

macro_rules! rm_file {
    ($repo:ident: $path:expr) => {{
        std::fs::remove_file($repo.to_fs_path($path))?;
    }};
}

macro_rules! commit {
    ($repo:ident: $msg:expr) => {
        $repo.commit(crate::commit::CommitOpts { message: Some($msg.to_owned()) })?
    };
}

macro_rules! read_file {
    ($repo:ident: $path:expr) => {
        std::fs::read_to_string($repo.to_fs_path($path))?
    };
}

use crate::commit::CommitOpts;
use crate::error::RitResult;
use crate::obj::Oid;
use crate::repo::RitRepo;
use quickcheck::Arbitrary;

/// initialize a repository in a temporary directory and use it in the closure
pub fn with_empty_repo<R>(f: impl FnOnce(&RitRepo) -> RitResult<R>) -> RitResult<R> {
    let dir = tempfile::tempdir()?;
    RitRepo::init(dir.path())?;
    let repo = RitRepo::load(dir.path())?;
    f(&repo)
}

/// a repository with a single commit adding `a.txt` and `dir/b.txt`
pub fn with_sample_repo<R>(f: impl FnOnce(&RitRepo) -> RitResult<R>) -> RitResult<R> {
    with_empty_repo(|repo| {
        touch!(repo: "a.txt" => "first file\n");
        touch!(repo: "dir/b.txt" => "second file\n");
        repo.add(".")?;
        commit!(repo: "initial commit");
        f(repo)
    })
}

pub fn commit_file(repo: &RitRepo, path: &str, content: &str, msg: &str) -> RitResult<Oid> {
    let abs = repo.to_fs_path(path);
    abs.parent().map(std::fs::create_dir_all).transpose()?;
    std::fs::write(abs, content)?;
    repo.add(path)?;
    Ok(repo.commit(CommitOpts { message: Some(msg.to_owned()) })?.oid)
}

pub fn generate_sane_path_component(g: &mut quickcheck::Gen) -> String {
    const CHARS: &[char] =
        &['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'x', 'y', 'z', '0', '1', '2', '-', '_', '.'];
    let len = 1 + usize::arbitrary(g) % 16;
    let mut s: String = (0..len).map(|_| *g.choose(CHARS).unwrap()).collect();
    // a path component must not be empty or dot-only
    if s.chars().all(|c| c == '.') {
        s.push('a');
    }
    s
}
