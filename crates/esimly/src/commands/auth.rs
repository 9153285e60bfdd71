//! Auth command handlers: login, logout, registration, verification,
//! and password reset.

use secrecy::SecretString;

use esimly_core::session::{BusinessSignup, PersonalSignup};

use crate::cli::{
    GlobalOpts, LoginArgs, RegisterCommand, ResetPasswordArgs, VerifyEmailArgs,
};
use crate::error::CliError;
use crate::output;

use super::util::{Context, core_err};

pub async fn login(ctx: &Context, args: LoginArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let email = match args.email {
        Some(email) => email,
        None => dialoguer::Input::new()
            .with_prompt("Email")
            .interact_text()
            .map_err(|e| CliError::Other {
                message: format!("prompt failed: {e}"),
            })?,
    };

    let password = rpassword::prompt_password("Password: ").map_err(|e| CliError::Other {
        message: format!("password prompt failed: {e}"),
    })?;
    let password = SecretString::from(password);

    let session = ctx
        .portal
        .session()
        .login(&email, &password)
        .await
        .map_err(core_err(ctx))?;

    output::notify_success(
        &format!(
            "Signed in as {} ({})",
            session.user.display_name(),
            session.user.role
        ),
        &global.color,
        global.quiet,
    );
    Ok(())
}

pub fn logout(ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    ctx.portal.session().logout();
    output::notify_success("Signed out", &global.color, global.quiet);
    Ok(())
}

pub fn whoami(ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    let Some(session) = ctx.portal.session().session() else {
        return Err(CliError::NotSignedIn);
    };

    let user = &session.user;
    let out = output::render_single(
        &global.output,
        user,
        |u| {
            let mut lines = vec![
                format!("Name:     {}", u.display_name()),
                format!("Email:    {}", u.email),
                format!("Role:     {}", u.role),
                format!("Account:  {}", u.account_type),
                format!("Status:   {}", u.status),
            ];
            if let Some(ref business) = u.business_name {
                lines.push(format!("Business: {business}"));
            }
            lines.join("\n")
        },
        |u| u.email.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn register(
    ctx: &Context,
    cmd: RegisterCommand,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let password = rpassword::prompt_password("Password: ").map_err(|e| CliError::Other {
        message: format!("password prompt failed: {e}"),
    })?;
    let confirm = rpassword::prompt_password("Confirm password: ").map_err(|e| CliError::Other {
        message: format!("password prompt failed: {e}"),
    })?;

    let message = match cmd {
        RegisterCommand::Personal(args) => {
            let form = PersonalSignup {
                first_name: args.first_name,
                last_name: args.last_name,
                email: args.email,
                password,
                confirm_password: confirm,
                phone_number: args.phone,
            };
            ctx.portal
                .session()
                .register_personal(&form)
                .await
                .map_err(core_err(ctx))?
                .unwrap_or_else(|| "Registered -- check your email to verify the address".into())
        }
        RegisterCommand::Business(args) => {
            let form = BusinessSignup {
                business_name: args.business_name,
                contact_name: args.contact_name,
                email: args.email,
                password,
                confirm_password: confirm,
                phone_number: args.phone,
                registration_number: args.registration_number,
            };
            ctx.portal
                .session()
                .register_business(&form)
                .await
                .map_err(core_err(ctx))?
                .unwrap_or_else(|| {
                    "Registered -- your business account is pending admin approval".into()
                })
        }
    };

    output::notify_success(&message, &global.color, global.quiet);
    Ok(())
}

pub async fn verify_email(
    ctx: &Context,
    args: VerifyEmailArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let message = ctx
        .portal
        .session()
        .verify_email(&args.token, &args.email)
        .await
        .map_err(core_err(ctx))?
        .unwrap_or_else(|| "Email verified -- you can sign in now".into());
    output::notify_success(&message, &global.color, global.quiet);
    Ok(())
}

pub async fn resend_verification(
    ctx: &Context,
    email: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let message = ctx
        .portal
        .session()
        .resend_verification(email)
        .await
        .map_err(core_err(ctx))?
        .unwrap_or_else(|| "Verification email sent".into());
    output::notify_success(&message, &global.color, global.quiet);
    Ok(())
}

pub async fn forgot_password(
    ctx: &Context,
    email: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let message = ctx
        .portal
        .session()
        .send_password_reset(email)
        .await
        .map_err(core_err(ctx))?
        .unwrap_or_else(|| "Password reset email sent".into());
    output::notify_success(&message, &global.color, global.quiet);
    Ok(())
}

pub async fn reset_password(
    ctx: &Context,
    args: ResetPasswordArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let password = rpassword::prompt_password("New password: ").map_err(|e| CliError::Other {
        message: format!("password prompt failed: {e}"),
    })?;
    let confirm =
        rpassword::prompt_password("Confirm new password: ").map_err(|e| CliError::Other {
            message: format!("password prompt failed: {e}"),
        })?;

    let message = ctx
        .portal
        .session()
        .reset_password(&args.token, &args.email, &password, &confirm)
        .await
        .map_err(core_err(ctx))?
        .unwrap_or_else(|| "Password updated -- sign in with the new password".into());
    output::notify_success(&message, &global.color, global.quiet);
    Ok(())
}
