use super::{describe_error, json_pretty, EXIT_SUCCESS};
use libpty_locator::LibraryResolver;

pub fn run(resolver: &LibraryResolver, json: bool) -> Result<u8, String> {
    let path = resolver
        .resolve_native_library()
        .map_err(|e| describe_error(&e))?;
    if json {
        let json = serde_json::json!({ "path": path.display().to_string() });
        println!("{}", json_pretty(&json)?);
    } else {
        println!("{}", path.display());
    }
    Ok(EXIT_SUCCESS)
}
