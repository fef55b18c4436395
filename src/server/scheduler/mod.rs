pub mod invitation_cleanup;
