//! Lua expression evaluator with sandboxing.

use mlua::{HookTriggers, Lua, Result as LuaResult, StdLib, Value, VmState};
use tracing::debug;

use super::bindings::register_helpers;
use super::types::{EvalError, SandboxConfig};
use super::{ExpressionEvaluator, Scope};

/// Evaluates expressions in a fresh, sandboxed Lua state.
///
/// Every table of the scope becomes a Lua table whose fields are its
/// columns, reachable by name (`speed.v`) and by 1-based position
/// (`speed[2]`). The scope prelude runs before the expression.
///
/// # Example
///
/// ```rust
/// use labgen_core::scripting::{ExpressionEvaluator, LuaEvaluator, Scope};
///
/// let mut scope = Scope::new();
/// scope.bind_table("t", vec![("x".to_string(), vec![1.0, 2.0])]);
/// let ys = LuaEvaluator::sandboxed().evaluate(&scope, "map(t.x, function(x) return x * 10 end)").unwrap();
/// assert_eq!(ys, vec![10.0, 20.0]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LuaEvaluator {
    config: SandboxConfig,
}

impl LuaEvaluator {
    pub fn new(config: SandboxConfig) -> Self {
        Self { config }
    }

    /// Create an evaluator with the default restrictive sandbox.
    pub fn sandboxed() -> Self {
        Self::new(SandboxConfig::restricted())
    }

    fn create_state(&self) -> Result<Lua, EvalError> {
        // Base functions (print, type, tostring, etc.) are always available
        let libs = StdLib::TABLE | StdLib::STRING | StdLib::UTF8 | StdLib::MATH;
        let lua = Lua::new_with(libs, mlua::LuaOptions::default())?;

        if self.config.memory_limit > 0 {
            lua.set_memory_limit(self.config.memory_limit)?;
        }

        if self.config.instruction_limit > 0 {
            let limit = self.config.instruction_limit;
            lua.set_hook(HookTriggers::new().every_nth_instruction(limit), move |_, _| {
                Err::<VmState, _>(mlua::Error::runtime(format!(
                    "expression exceeded {limit} instructions"
                )))
            });
        }

        apply_sandbox(&lua)?;
        register_helpers(&lua, self.config.max_points())?;
        Ok(lua)
    }

    fn bind_scope(lua: &Lua, scope: &Scope) -> LuaResult<()> {
        let globals = lua.globals();
        for (table_name, columns) in scope.tables() {
            let table = lua.create_table()?;
            for (i, (column, values)) in columns.iter().enumerate() {
                let seq = lua.create_sequence_from(values.iter().copied())?;
                table.set(column.as_str(), seq.clone())?;
                table.set(i + 1, seq)?;
            }
            globals.set(table_name.as_str(), table)?;
        }
        Ok(())
    }
}

impl ExpressionEvaluator for LuaEvaluator {
    fn evaluate(&self, scope: &Scope, expr: &str) -> Result<Vec<f64>, EvalError> {
        let lua = self.create_state()?;
        Self::bind_scope(&lua, scope)?;

        if !scope.prelude().trim().is_empty() {
            lua.load(scope.prelude()).set_name("scope").exec()?;
        }

        debug!(expr, "evaluating expression");
        let value: Value = lua.load(format!("return {expr}")).set_name("expression").eval()?;

        match value {
            Value::Integer(i) => Ok(vec![i as f64]),
            Value::Number(n) => Ok(vec![n]),
            Value::Table(t) => Ok(t.sequence_values::<f64>().collect::<LuaResult<Vec<f64>>>()?),
            other => Err(EvalError::NotNumeric {
                expr: expr.to_string(),
                found: other.type_name().to_string(),
            }),
        }
    }
}

/// Remove globals that could load code, reach the filesystem or the
/// shell, or inspect the VM.
fn apply_sandbox(lua: &Lua) -> LuaResult<()> {
    let globals = lua.globals();
    for name in [
        "dofile",
        "loadfile",
        "load",
        "require",
        "package",
        "io",
        "os",
        "debug",
        "collectgarbage",
    ] {
        globals.set(name, Value::Nil)?;
    }
    Ok(())
}
