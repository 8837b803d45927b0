// src/banner.rs

/// Prints the application startup banner to the console.
pub fn print_banner(endpoint: &str) {
    let banner = r#"
     _       __             _ _
  __| | ___ / _| __ _ _   _| | |_
 / _` |/ _ \ |_ / _` | | | | | __|
| (_| |  __/  _| (_| | |_| | | |_
 \__,_|\___|_|  \__,_|\__,_|_|\__|

    Customer Default Prediction Client
"#;
    println!("{}", banner);
    println!("    Prediction endpoint: {}\n", endpoint);
}
