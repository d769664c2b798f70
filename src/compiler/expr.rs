use inkwell::{
    basic_block::BasicBlock,
    values::{BasicMetadataValueEnum, FloatValue, FunctionValue, IntValue},
    FloatPredicate,
};

use crate::{
    ast::{declarations::Prototype, expressions::Expr},
    errors::errors::{Error, ErrorImpl},
};

use super::compiler::Compiler;

/// Generates LLVM IR for the given expression.
pub fn gen_expression<'ctx>(
    compiler: &mut Compiler<'_, 'ctx>,
    expression: &Expr,
) -> Result<FloatValue<'ctx>, Error> {
    match expression {
        Expr::Number(value) => Ok(compiler.context.f64_type().const_float(*value)),
        Expr::Variable(name) => compiler.named_values.get(name).copied().ok_or_else(|| {
            Error::unpositioned(ErrorImpl::UnknownVariable {
                variable: name.clone(),
            })
        }),
        Expr::Unary { operator, operand } => gen_unary(compiler, *operator, operand),
        Expr::Binary { operator, left, right } => gen_binary(compiler, *operator, left, right),
        Expr::Call { callee, arguments } => gen_call(compiler, callee, arguments),
        Expr::If {
            condition,
            then_branch,
            else_branch,
        } => gen_if(compiler, condition, then_branch, else_branch),
        Expr::For {
            variable,
            start,
            end,
            step,
            body,
        } => gen_for(compiler, variable, start, end, step.as_deref(), body),
    }
}

fn gen_unary<'ctx>(
    compiler: &mut Compiler<'_, 'ctx>,
    operator: char,
    operand: &Expr,
) -> Result<FloatValue<'ctx>, Error> {
    let operand = gen_expression(compiler, operand)?;

    let name = Prototype::unary_name(operator);
    let function = compiler
        .get_function(&name)
        .ok_or_else(|| Error::unpositioned(ErrorImpl::UnknownFunction { function: name }))?;

    build_call(compiler, function, &[operand.into()], "unop")
}

fn gen_binary<'ctx>(
    compiler: &mut Compiler<'_, 'ctx>,
    operator: char,
    left: &Expr,
    right: &Expr,
) -> Result<FloatValue<'ctx>, Error> {
    let left = gen_expression(compiler, left)?;
    let right = gen_expression(compiler, right)?;

    let builder = &compiler.builder;
    match operator {
        '+' => Ok(builder.build_float_add(left, right, "addtmp")?),
        '-' => Ok(builder.build_float_sub(left, right, "subtmp")?),
        '*' => Ok(builder.build_float_mul(left, right, "multmp")?),
        '<' => {
            let comparison = builder.build_float_compare(FloatPredicate::ULT, left, right, "cmptmp")?;
            Ok(builder.build_unsigned_int_to_float(comparison, compiler.context.f64_type(), "booltmp")?)
        }
        _ => {
            // The parser only sees an operator once its function compiled.
            let function = match compiler.get_function(&Prototype::binary_name(operator)) {
                Some(function) => function,
                None => panic!("binary operator {:?} is in the operator table but has no function", operator),
            };

            build_call(compiler, function, &[left.into(), right.into()], "binop")
        }
    }
}

fn gen_call<'ctx>(
    compiler: &mut Compiler<'_, 'ctx>,
    callee: &str,
    arguments: &[Expr],
) -> Result<FloatValue<'ctx>, Error> {
    let function = compiler.get_function(callee).ok_or_else(|| {
        Error::unpositioned(ErrorImpl::UnknownFunction {
            function: String::from(callee),
        })
    })?;

    let expected = function.count_params() as usize;
    if expected != arguments.len() {
        return Err(Error::unpositioned(ErrorImpl::ArityMismatch {
            function: String::from(callee),
            expected,
            received: arguments.len(),
        }));
    }

    let mut values: Vec<BasicMetadataValueEnum> = Vec::with_capacity(arguments.len());
    for argument in arguments {
        values.push(gen_expression(compiler, argument)?.into());
    }

    build_call(compiler, function, &values, "calltmp")
}

fn build_call<'ctx>(
    compiler: &Compiler<'_, 'ctx>,
    function: FunctionValue<'ctx>,
    arguments: &[BasicMetadataValueEnum<'ctx>],
    name: &str,
) -> Result<FloatValue<'ctx>, Error> {
    compiler
        .builder
        .build_call(function, arguments, name)?
        .try_as_basic_value()
        .left()
        .map(|value| value.into_float_value())
        .ok_or_else(|| {
            Error::unpositioned(ErrorImpl::Backend {
                message: format!("call to {:?} produced no value", function.get_name()),
            })
        })
}

/// `value != 0.0` as an i1.
fn gen_truth<'ctx>(
    compiler: &Compiler<'_, 'ctx>,
    value: FloatValue<'ctx>,
    name: &str,
) -> Result<IntValue<'ctx>, Error> {
    let zero = compiler.context.f64_type().const_float(0.0);
    Ok(compiler
        .builder
        .build_float_compare(FloatPredicate::ONE, value, zero, name)?)
}

fn gen_if<'ctx>(
    compiler: &mut Compiler<'_, 'ctx>,
    condition: &Expr,
    then_branch: &Expr,
    else_branch: &Expr,
) -> Result<FloatValue<'ctx>, Error> {
    let condition = gen_expression(compiler, condition)?;
    let condition = gen_truth(compiler, condition, "ifcond")?;

    let parent_function = compiler.current_function()?;
    let then_block = compiler.create_basic_block("then", parent_function);
    let else_block = compiler.create_basic_block("else", parent_function);
    let merge_block = compiler.create_basic_block("ifcont", parent_function);

    compiler
        .builder
        .build_conditional_branch(condition, then_block, else_block)?;

    compiler.builder.position_at_end(then_block);
    let then_value = gen_expression(compiler, then_branch)?;
    compiler.builder.build_unconditional_branch(merge_block)?;
    // Nested control flow may have moved the cursor to another block.
    let then_end = compiler.current_block()?;

    compiler.builder.position_at_end(else_block);
    let else_value = gen_expression(compiler, else_branch)?;
    compiler.builder.build_unconditional_branch(merge_block)?;
    let else_end = compiler.current_block()?;

    compiler.builder.position_at_end(merge_block);
    let phi = compiler
        .builder
        .build_phi(compiler.context.f64_type(), "iftmp")?;
    phi.add_incoming(&[(&then_value, then_end), (&else_value, else_end)]);

    Ok(phi.as_basic_value().into_float_value())
}

/// Lowers a counting loop. The body runs at least once; the end condition is
/// evaluated after each iteration with the variable bound to its next value.
/// The loop itself always evaluates to 0.
fn gen_for<'ctx>(
    compiler: &mut Compiler<'_, 'ctx>,
    variable: &str,
    start: &Expr,
    end: &Expr,
    step: Option<&Expr>,
    body: &Expr,
) -> Result<FloatValue<'ctx>, Error> {
    let f64_type = compiler.context.f64_type();

    let start = gen_expression(compiler, start)?;

    let parent_function = compiler.current_function()?;
    let preheader_block = compiler.current_block()?;
    let loop_block = compiler.create_basic_block("loop", parent_function);

    compiler.builder.build_unconditional_branch(loop_block)?;
    compiler.builder.position_at_end(loop_block);

    let induction = compiler.builder.build_phi(f64_type, variable)?;
    induction.add_incoming(&[(&start, preheader_block)]);
    let current = induction.as_basic_value().into_float_value();

    let shadowed = compiler.named_values.insert(String::from(variable), current);

    let result = gen_loop_iteration(compiler, loop_block, variable, current, end, step, body);

    match shadowed {
        Some(value) => compiler.named_values.insert(String::from(variable), value),
        None => compiler.named_values.remove(variable),
    };

    let (next, loop_end) = result?;
    induction.add_incoming(&[(&next, loop_end)]);

    Ok(f64_type.const_zero())
}

/// Body, step and exit test of a loop. Returns the next induction value and
/// the block the back edge leaves from.
fn gen_loop_iteration<'ctx>(
    compiler: &mut Compiler<'_, 'ctx>,
    loop_block: BasicBlock<'ctx>,
    variable: &str,
    current: FloatValue<'ctx>,
    end: &Expr,
    step: Option<&Expr>,
    body: &Expr,
) -> Result<(FloatValue<'ctx>, BasicBlock<'ctx>), Error> {
    gen_expression(compiler, body)?;

    let step = match step {
        Some(step) => gen_expression(compiler, step)?,
        None => compiler.context.f64_type().const_float(1.0),
    };

    let next = compiler.builder.build_float_add(current, step, "nextvar")?;
    compiler.named_values.insert(String::from(variable), next);

    let end = gen_expression(compiler, end)?;
    let end_condition = gen_truth(compiler, end, "loopcond")?;

    let loop_end = compiler.current_block()?;
    let parent_function = compiler.current_function()?;
    let after_block = compiler.create_basic_block("afterloop", parent_function);

    compiler
        .builder
        .build_conditional_branch(end_condition, loop_block, after_block)?;
    compiler.builder.position_at_end(after_block);

    Ok((next, loop_end))
}
