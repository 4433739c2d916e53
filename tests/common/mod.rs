use anyhow::Result;
use wordvm_rs::Console;

/// In-memory console: pops scripted input numbers, records all output.
#[derive(Default)]
pub struct ScriptedConsole {
    pub inputs: Vec<i64>,
    pub printed: Vec<i64>,
    pub text: String,
}

impl ScriptedConsole {
    pub fn with_inputs(inputs: Vec<i64>) -> Self {
        Self { inputs, ..Default::default() }
    }
}

impl Console for ScriptedConsole {
    fn read_number(&mut self) -> Result<Option<i64>> {
        if self.inputs.is_empty() {
            // End of scripted input behaves like EOF on stdin.
            return Ok(None);
        }
        Ok(Some(self.inputs.remove(0)))
    }

    fn write_number(&mut self, value: i64) -> Result<()> {
        self.printed.push(value);
        Ok(())
    }

    fn write_str(&mut self, text: &str) -> Result<()> {
        self.text.push_str(text);
        Ok(())
    }
}
