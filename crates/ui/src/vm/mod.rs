mod edit_vm;
mod take_vm;
mod time_fmt;

pub use edit_vm::{EditOptionRow, EditQuestionRow, EditQuizVm};
pub use take_vm::{TakeIntent, TakeOutcome, TakeQuizVm};
pub use time_fmt::format_clock;
