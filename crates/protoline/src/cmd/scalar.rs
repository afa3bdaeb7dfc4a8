use crate::cmd::{BoolArgs, DoubleArgs, FloatArgs, IntArgs, IntWidth, LongArgs, UtfArgs};
use crate::exit::{output_error, CliError, CliResult, USAGE};
use crate::sink::CliOutput;

const CONTEXT: &str = "write failed";

pub fn write_bools(out: &mut CliOutput, args: &BoolArgs) -> CliResult<()> {
    for value in &args.values {
        out.write_bool(*value)
            .map_err(|err| output_error(CONTEXT, err))?;
    }
    Ok(())
}

pub fn write_ints(out: &mut CliOutput, args: &IntArgs) -> CliResult<()> {
    // Range-check every value before writing any record.
    for value in &args.values {
        check_width(*value, args.width)?;
    }

    for value in &args.values {
        let result = match args.width {
            IntWidth::Byte => out.write_byte(*value as i8),
            IntWidth::Short => out.write_short(*value as i16),
            IntWidth::Int => out.write_int(*value),
        };
        result.map_err(|err| output_error(CONTEXT, err))?;
    }
    Ok(())
}

pub fn write_longs(out: &mut CliOutput, args: &LongArgs) -> CliResult<()> {
    for value in &args.values {
        out.write_long(*value)
            .map_err(|err| output_error(CONTEXT, err))?;
    }
    Ok(())
}

pub fn write_floats(out: &mut CliOutput, args: &FloatArgs) -> CliResult<()> {
    for value in &args.values {
        out.write_float(*value)
            .map_err(|err| output_error(CONTEXT, err))?;
    }
    Ok(())
}

pub fn write_doubles(out: &mut CliOutput, args: &DoubleArgs) -> CliResult<()> {
    for value in &args.values {
        out.write_double(*value)
            .map_err(|err| output_error(CONTEXT, err))?;
    }
    Ok(())
}

pub fn write_utfs(out: &mut CliOutput, args: &UtfArgs) -> CliResult<()> {
    for value in &args.values {
        out.write_utf(value)
            .map_err(|err| output_error(CONTEXT, err))?;
    }
    Ok(())
}

fn check_width(value: i32, width: IntWidth) -> CliResult<()> {
    let fits = match width {
        IntWidth::Byte => i8::try_from(value).is_ok(),
        IntWidth::Short => i16::try_from(value).is_ok(),
        IntWidth::Int => true,
    };
    if fits {
        Ok(())
    } else {
        Err(CliError::new(
            USAGE,
            format!("value {value} does not fit in {width:?} width"),
        ))
    }
}
