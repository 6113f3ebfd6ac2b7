#![allow(dead_code)]

use tinysh::console::Console;
use tinysh::exec::ProcessControl;
use tinysh::parse::{Command, OutputTarget, Pipeline};
use tinysh::session::{Session, SessionSettings};

use crate::capture::{captured_console, SharedBuffer};
use crate::fake_control::FakeProcessControl;

/// Builder for `Command` to simplify test setup.
pub struct CommandBuilder {
    command: Command,
}

impl CommandBuilder {
    pub fn new(program: &str) -> Self {
        Self {
            command: Command::new([program]),
        }
    }

    pub fn arg(mut self, arg: &str) -> Self {
        self.command.args.push(arg.to_string());
        self
    }

    pub fn stdin(mut self, path: &str) -> Self {
        self.command.redirects.input = Some(path.to_string());
        self
    }

    pub fn stdout(mut self, path: &str) -> Self {
        self.command.redirects.output = Some(OutputTarget {
            path: path.to_string(),
            append: false,
        });
        self
    }

    pub fn append_stdout(mut self, path: &str) -> Self {
        self.command.redirects.output = Some(OutputTarget {
            path: path.to_string(),
            append: true,
        });
        self
    }

    pub fn stderr(mut self, path: &str) -> Self {
        self.command.redirects.error = Some(OutputTarget {
            path: path.to_string(),
            append: false,
        });
        self
    }

    pub fn background(mut self) -> Self {
        self.command.background = true;
        self
    }

    pub fn build(self) -> Command {
        self.command
    }
}

/// Builder for `Pipeline`. Adding a second stage sets `has_pipes`;
/// `background()` applies to every stage, as the parser does.
#[derive(Default)]
pub struct PipelineBuilder {
    pipeline: Pipeline,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(mut self, command: Command) -> Self {
        self.pipeline.commands.push(command);
        if self.pipeline.commands.len() > 1 {
            self.pipeline.has_pipes = true;
        }
        self
    }

    pub fn background(mut self) -> Self {
        self.pipeline.background = true;
        self
    }

    pub fn build(mut self) -> Pipeline {
        let background = self.pipeline.background;
        for command in &mut self.pipeline.commands {
            command.background = background;
        }
        self.pipeline
    }
}

/// A session over `control` with captured output.
pub struct TestSession<P: ProcessControl> {
    pub session: Session<P>,
    pub out: SharedBuffer,
    pub err: SharedBuffer,
}

impl<P: ProcessControl> TestSession<P> {
    pub fn new(control: P) -> Self {
        Self::with_settings(control, SessionSettings::default())
    }

    pub fn with_settings(control: P, settings: SessionSettings) -> Self {
        let (console, out, err): (Console, _, _) = captured_console();
        Self {
            session: Session::new(control, console, settings),
            out,
            err,
        }
    }
}

/// A session over a fresh [`FakeProcessControl`].
pub fn fake_session() -> TestSession<FakeProcessControl> {
    TestSession::new(FakeProcessControl::new())
}
