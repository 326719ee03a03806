mod run_programs;
mod sort_programs;

/// The message that the programs in these tests authorize.
pub const MESSAGE: &[u8] = b"version=1;inputs=[a1f3:0];outputs=[EXh7:100000]";
