use std::net::SocketAddr;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServeError {
	#[error("failed to bind {addr}: {reason}")]
	Bind { addr: SocketAddr, reason: String },
}

pub type Result<T> = std::result::Result<T, ServeError>;
