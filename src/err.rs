/// One line per error in the chain, outermost first.
pub fn format_anyhow_chain(err: &anyhow::Error) -> String {
    err.chain()
        .skip(1)
        .fold(err.to_string(), |output, cause| {
            format!("{output}\nCaused by: {cause}")
        })
}
