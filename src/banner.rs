// src/banner.rs

/// Prints the startup banner to the console.
pub fn print_banner() {
    let banner = r#"
 _          _            _                 _ _            _
| | ___   _| |__  ___   | | ___   __ _  __| | |_ ___  ___| |_
| |/ / | | | '_ \/ __|  | |/ _ \ / _` |/ _` | __/ _ \/ __| __|
|   <| |_| | |_) \__ \  | | (_) | (_| | (_| | ||  __/\__ \ |_
|_|\_\\__,_|_.__/|___/  |_|\___/ \__,_|\__,_|\__\___||___/\__|

    Job Submission Load Generator
"#;
    println!("{}", banner);
}
