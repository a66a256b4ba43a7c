//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (HMAC-SHA256, base64url, random bytes)
//! - Password hashing (Argon2id) and the signup password policy
//! - Signed bearer tokens (compact JWS, HS256)
//! - `Authorization` header parsing

pub mod bearer;
pub mod crypto;
pub mod password;
pub mod token;
