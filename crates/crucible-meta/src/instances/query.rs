//! `cdmq` command-line options derived from `query-from`.

use super::document::RegistryDocument;

/// Tokens for every query source, in `query-from` order: `--host <host>`,
/// followed by `--userpass <path>` when the instance carries one.
///
/// Names without a matching instance are skipped.
pub fn query_args(doc: &RegistryDocument) -> Vec<String> {
    let mut args = Vec::new();
    for instance in doc.query_from.iter().filter_map(|name| doc.find(name)) {
        args.push("--host".to_string());
        args.push(instance.host.clone());
        if let Some(userpass) = &instance.userpass {
            args.push("--userpass".to_string());
            args.push(userpass.clone());
        }
    }
    args
}

/// The flattened option string, each token preceded by a single space.
pub fn query_options(doc: &RegistryDocument) -> String {
    query_args(doc)
        .iter()
        .fold(String::new(), |mut line, token| {
            line.push(' ');
            line.push_str(token);
            line
        })
}
