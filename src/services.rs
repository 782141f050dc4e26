pub mod sync_folders;
