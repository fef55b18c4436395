mod audit;
mod club;
mod course;
mod follow;
mod invitation;
mod job;
mod notification;
mod organization;
mod post;
mod research;
mod user;
