//! Numeric helper functions available to expressions.

use mlua::{Function, Lua, Result as LuaResult};

/// Register the helper globals.
///
/// After calling this function, expressions can use:
/// - `map(xs, f)` - apply `f` to every element
/// - `zip(xs, ys, f)` - combine two arrays of the same length element-wise
/// - `linspace(a, b, n)` - `n` evenly spaced values from `a` to `b`, with
///   `n` at most `max_points`
pub fn register_helpers(lua: &Lua, max_points: usize) -> LuaResult<()> {
    let globals = lua.globals();
    globals.set("map", create_map_fn(lua)?)?;
    globals.set("zip", create_zip_fn(lua)?)?;
    globals.set("linspace", create_linspace_fn(lua, max_points)?)?;
    Ok(())
}

/// ```lua
/// map({1, 2, 3}, function(x) return x * x end)  -- {1, 4, 9}
/// ```
fn create_map_fn(lua: &Lua) -> LuaResult<Function> {
    lua.create_function(|_, (xs, f): (Vec<f64>, Function)| {
        xs.into_iter().map(|x| f.call::<f64>(x)).collect::<LuaResult<Vec<f64>>>()
    })
}

/// ```lua
/// zip({1, 2}, {10, 20}, function(a, b) return a + b end)  -- {11, 22}
/// ```
fn create_zip_fn(lua: &Lua) -> LuaResult<Function> {
    lua.create_function(|_, (xs, ys, f): (Vec<f64>, Vec<f64>, Function)| {
        if xs.len() != ys.len() {
            return Err(mlua::Error::runtime(format!(
                "zip: arrays differ in length ({} vs {})",
                xs.len(),
                ys.len()
            )));
        }
        xs.into_iter().zip(ys).map(|(x, y)| f.call::<f64>((x, y))).collect::<LuaResult<Vec<f64>>>()
    })
}

/// ```lua
/// linspace(0, 1, 5)  -- {0, 0.25, 0.5, 0.75, 1}
/// ```
fn create_linspace_fn(lua: &Lua, max_points: usize) -> LuaResult<Function> {
    lua.create_function(move |_, (a, b, n): (f64, f64, usize)| {
        if n > max_points {
            return Err(mlua::Error::runtime(format!(
                "linspace: {n} points requested, at most {max_points} allowed"
            )));
        }
        Ok(match n {
            0 => Vec::new(),
            1 => vec![a],
            _ => {
                let step = (b - a) / (n - 1) as f64;
                (0..n).map(|i| a + step * i as f64).collect()
            }
        })
    })
}
