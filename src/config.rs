use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub port: u16,
}

impl Config {
    /// Reads DATABASE_URL, JWT_SECRET and PORT (default 8080) from the
    /// environment. Call `dotenvy::dotenv()` first to pick up an .env file.
    pub fn from_env() -> Result<Self, String> {
        let database_url =
            env::var("DATABASE_URL").map_err(|_| String::from("DATABASE_URL is not set"))?;
        let jwt_secret =
            env::var("JWT_SECRET").map_err(|_| String::from("JWT_SECRET is not set"))?;
        let port = match env::var("PORT") {
            Ok(value) => value
                .parse()
                .map_err(|_| format!("invalid PORT value: {value}"))?,
            Err(_) => 8080,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            port,
        })
    }
}
