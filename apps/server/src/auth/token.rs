use rand::Rng;

/// Generates a random 64-character hex signing secret
pub fn generate_secret() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();
    hex::encode(bytes)
}

/// Resolves the signing secret: the configured one, or a fresh random one
pub fn resolve_secret(configured: Option<&str>) -> String {
    match configured {
        Some(secret) => secret.to_string(),
        None => {
            log::warn!("JWT_SECRET not set, using random secret (tokens won't survive restarts)");
            generate_secret()
        }
    }
}
