mod rit_add;
mod rit_cat_file;
mod rit_hash_object;
mod rit_ls_files;
mod rit_update_index;
mod rit_update_ref;
mod rit_write_tree;

pub use rit_add::*;
pub use rit_cat_file::*;
pub use rit_hash_object::*;
pub use rit_ls_files::*;
pub use rit_update_index::*;
pub use rit_update_ref::*;
pub use rit_write_tree::*;
