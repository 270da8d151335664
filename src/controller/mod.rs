pub mod employee_form;
pub mod employee_list;
pub mod login;
pub mod role_management;

pub use employee_form::EmployeeFormController;
pub use employee_list::EmployeeListController;
pub use login::LoginController;
pub use role_management::RoleManagementController;
