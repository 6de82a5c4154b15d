use super::{describe_error, json_pretty, RootSource, EXIT_SUCCESS};
use libpty_locator::LibraryResolver;

pub fn run(resolver: &LibraryResolver, source: RootSource, json: bool) -> Result<u8, String> {
    let host = resolver.host();
    let kind = host.platform_kind().map_err(|e| describe_error(&e))?;
    let lib_folder = resolver.config().lib_folder();

    if json {
        let json = serde_json::json!({
            "os": host.os_name(),
            "platform": kind,
            "platform_folder": kind.folder_name(),
            "architecture": host.architecture_tag(),
            "file_name": kind.native_file_name(),
            "lib_folder": lib_folder.map(|p| p.display().to_string()),
            "lib_folder_source": source.label(),
        });
        println!("{}", json_pretty(&json)?);
    } else {
        println!("os:              {}", host.os_name());
        println!("platform folder: {}", kind.folder_name());
        println!("architecture:    {}", host.architecture_tag());
        println!("file name:       {}", kind.native_file_name());
        match lib_folder {
            Some(folder) => println!(
                "lib folder:      {} (from {})",
                folder.display(),
                source.label()
            ),
            None => println!("lib folder:      (not set, located from executable)"),
        }
    }
    Ok(EXIT_SUCCESS)
}
