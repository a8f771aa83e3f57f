use std::{env, process::ExitCode, time::Instant};

use exactnum::{
    ArithError, ArithResult, ArithTracer, BigDecimal, BigInteger, DEFAULT_CERTAINTY, MathContext, NoopTracer, RoundingMode, Session,
    StderrTracer,
};

const USAGE: &str = "\
usage: exactnum <op> <operands...> [--precision N] [--rounding MODE] [--seed N] [--trace]

decimal ops:  add sub mul div sqrt round pow <a> [b]   pi e
integer ops:  gcd lcm modpow <a> <b> <m>   modinv <a> <m>   isprime <n>   nextprime <n>   prime <bits>
              radix <n> <radix>";

/// Parsed command line.
struct Command {
    op: String,
    operands: Vec<String>,
    context: MathContext,
    seed: Option<u64>,
    trace: bool,
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();
    let command = match parse_args(&args) {
        Ok(command) => command,
        Err(err) => {
            eprintln!("error: {err}\n\n{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    let start = Instant::now();
    let result = if command.trace {
        run(&command, StderrTracer::new())
    } else {
        run(&command, NoopTracer)
    };
    let elapsed = start.elapsed();
    match result {
        Ok(value) => {
            eprintln!("success after: {elapsed:?}");
            println!("{value}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error after: {elapsed:?}\n{err}");
            ExitCode::FAILURE
        }
    }
}

fn parse_args(args: &[String]) -> Result<Command, String> {
    let mut positional = Vec::new();
    let mut precision = 0;
    let mut rounding = RoundingMode::HalfUp;
    let mut seed = None;
    let mut trace = false;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--precision" => {
                let value = iter.next().ok_or("--precision needs a value")?;
                precision = value.parse().map_err(|_| format!("bad precision `{value}`"))?;
            }
            "--rounding" => {
                let value = iter.next().ok_or("--rounding needs a value")?;
                rounding = value
                    .to_ascii_uppercase()
                    .parse()
                    .map_err(|_| format!("unknown rounding mode `{value}`"))?;
            }
            "--seed" => {
                let value = iter.next().ok_or("--seed needs a value")?;
                seed = Some(value.parse().map_err(|_| format!("bad seed `{value}`"))?);
            }
            "--trace" => trace = true,
            "-h" | "--help" => return Err("help requested".to_owned()),
            _ => positional.push(arg.clone()),
        }
    }
    let mut positional = positional.into_iter();
    let op = positional.next().ok_or("missing operation")?;
    Ok(Command {
        op,
        operands: positional.collect(),
        context: MathContext::new(precision, rounding),
        seed,
        trace,
    })
}

fn run<T: ArithTracer>(command: &Command, tracer: T) -> ArithResult<String> {
    let session = match command.seed {
        Some(seed) => Session::seeded(seed),
        None => Session::new(),
    };
    let mut session = session.with_context(command.context).with_tracer(tracer);
    let operands = &command.operands;
    let decimal = |index: usize| -> ArithResult<_> { operand(operands, index)?.parse::<BigDecimal>() };
    let integer = |index: usize| -> ArithResult<BigInteger> { operand(operands, index)?.parse() };

    let value = match command.op.as_str() {
        "add" => session.add(&decimal(0)?, &decimal(1)?)?.to_string(),
        "sub" => session.subtract(&decimal(0)?, &decimal(1)?)?.to_string(),
        "mul" => session.multiply(&decimal(0)?, &decimal(1)?)?.to_string(),
        "div" => session.divide(&decimal(0)?, &decimal(1)?)?.to_string(),
        "sqrt" => session.sqrt(&decimal(0)?)?.to_string(),
        "round" => session.round(&decimal(0)?)?.to_string(),
        "pow" => {
            let exponent = operand(operands, 1)?
                .parse::<u32>()
                .map_err(|_| invalid("pow", "exponent must fit in u32"))?;
            decimal(0)?.pow_with_context(exponent, &session.context())?.to_string()
        }
        "pi" => session.pi()?.to_string(),
        "e" => session.e()?.to_string(),
        "gcd" => integer(0)?.gcd(&integer(1)?).to_string(),
        "lcm" => integer(0)?.lcm(&integer(1)?).to_string(),
        "modpow" => integer(0)?.mod_pow(&integer(1)?, &integer(2)?)?.to_string(),
        "modinv" => integer(0)?.mod_inverse(&integer(1)?)?.to_string(),
        "isprime" => session.is_probable_prime(&integer(0)?, DEFAULT_CERTAINTY).to_string(),
        "nextprime" => session.next_probable_prime(&integer(0)?, DEFAULT_CERTAINTY).to_string(),
        "prime" => {
            let bits = operand(operands, 0)?
                .parse::<u64>()
                .map_err(|_| invalid("prime", "bit length must be a non-negative integer"))?;
            session.probable_prime(bits, DEFAULT_CERTAINTY)?.to_string()
        }
        "radix" => {
            let radix = operand(operands, 1)?
                .parse::<u32>()
                .map_err(|_| invalid("radix", "radix must be an integer"))?;
            integer(0)?.to_str_radix(radix)?
        }
        other => return Err(invalid("exactnum", format!("unknown operation `{other}`"))),
    };
    Ok(value)
}

fn operand(operands: &[String], index: usize) -> ArithResult<&str> {
    operands
        .get(index)
        .map(String::as_str)
        .ok_or_else(|| invalid("exactnum", format!("missing operand {}", index + 1)))
}

fn invalid(operation: &'static str, reason: impl Into<String>) -> ArithError {
    ArithError::InvalidArgument {
        operation,
        reason: reason.into(),
    }
}
