use dotenvy::dotenv;

const ENDPOINTS: [&str; 2] = ["API_URL", "WSS_URL"];

fn main() {
  // Tell Cargo that if the env file changes, to rerun this build script.
  println!("cargo::rerun-if-changed=.env");

  // a missing .env is fine, the app falls back to the local backend
  dotenv().ok();

  for name in ENDPOINTS {
    println!("cargo::rerun-if-env-changed={}", name);
    if let Ok(value) = std::env::var(name) {
      println!("cargo::rustc-env={}={}", name, value);
    }
  }
}
