use super::{describe_error, json_pretty, EXIT_SUCCESS};
use libpty_locator::LibraryResolver;

pub fn run(resolver: &LibraryResolver, name: &str, json: bool) -> Result<u8, String> {
    let path = resolver
        .resolve_native_file(name)
        .map_err(|e| describe_error(&e))?;
    if json {
        println!(
            "{}",
            json_pretty(&serde_json::json!({
                "name": name,
                "path": path.display().to_string(),
            }))?
        );
    } else {
        println!("{}", path.display());
    }
    Ok(EXIT_SUCCESS)
}
