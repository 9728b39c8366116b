mod auth;
mod session;
mod sftp;

pub use session::{Credential, RemoteTarget};
pub use sftp::{SftpUploader, Uploader};
