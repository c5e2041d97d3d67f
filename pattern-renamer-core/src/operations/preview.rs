use crate::config::Config;
use crate::engine::RenameInput;
use crate::output::PreviewResult;
use crate::session::Session;

/// Preview operation - computes the renamed paths without touching anything
pub fn preview_operation(input: &RenameInput, config: &Config) -> PreviewResult {
    let mut session = Session::new(config);
    let preview = session.set_input(input);
    tracing::debug!(
        paths = preview.picked_paths.len(),
        mistakes = preview.mistakes.len(),
        can_apply = preview.can_apply,
        "preview computed"
    );
    PreviewResult::new(session.input(), session.preview())
}
